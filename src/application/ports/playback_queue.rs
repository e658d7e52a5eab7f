//! Playback Queue Port - 读み上げ队列
//!
//! 每个 guild 一个严格 FIFO 队列，同一时刻至多一个消费循环

use crate::domain::{GuildKey, QueueItem};

/// 队列状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// 没有消费循环在运行
    Idle,
    /// 消费循环正在运行
    Draining,
}

/// 入队结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueOutcome {
    /// 入队后、包含本条在内的待处理条目数
    pub pending: usize,
    /// 本次入队是否启动了新的消费循环
    pub started_drain: bool,
}

/// Playback Queue Port
pub trait PlaybackQueuePort: Send + Sync {
    /// 追加到队尾；队列空闲时启动消费循环
    fn enqueue(&self, item: QueueItem) -> EnqueueOutcome;

    /// 丢弃所有待处理条目并中止正在处理的条目，返回丢弃数量
    fn cancel(&self, guild: GuildKey) -> usize;

    /// 队列状态
    fn state(&self, guild: GuildKey) -> QueueState;

    /// 待处理条目数（不含正在处理的条目）
    fn pending(&self, guild: GuildKey) -> usize;
}
