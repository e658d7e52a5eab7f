//! Guild Playback Queues - 每个 guild 一个 FIFO 读み上げ队列
//!
//! 入队时若队列空闲则启动唯一的消费循环；循环在队列取空时回到空闲

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use super::processor::{ItemOutcome, QueueProcessor};
use crate::application::ports::{EnqueueOutcome, PlaybackQueuePort, QueueState};
use crate::domain::{GuildKey, QueueItem};

/// 消费循环统计
#[derive(Debug, Default)]
pub struct DrainStats {
    active: AtomicUsize,
    max_active: AtomicUsize,
    processed: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

/// 统计快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainStatsSnapshot {
    /// 处于 Draining 的队列数（所有 guild），与状态切换在同一把锁内更新
    pub active: usize,
    /// 历史上同时运行的最大消费循环数
    pub max_active: usize,
    pub processed: u64,
    pub failed: u64,
    pub cancelled: u64,
}

impl DrainStats {
    pub fn snapshot(&self) -> DrainStatsSnapshot {
        DrainStatsSnapshot {
            active: self.active.load(Ordering::SeqCst),
            max_active: self.max_active.load(Ordering::SeqCst),
            processed: self.processed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            cancelled: self.cancelled.load(Ordering::SeqCst),
        }
    }

    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

struct QueueInner {
    items: VecDeque<QueueItem>,
    state: QueueState,
    cancel: CancellationToken,
}

/// 单个 guild 的队列
///
/// 锁只在入队、出队、取消时短暂持有，从不跨越 await
struct GuildQueue {
    inner: Mutex<QueueInner>,
}

impl GuildQueue {
    fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                items: VecDeque::new(),
                state: QueueState::Idle,
                cancel: CancellationToken::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 取出队头；队列为空时在同一把锁内切换为 Idle
    fn next(&self, stats: &DrainStats) -> Option<(QueueItem, CancellationToken)> {
        let mut inner = self.lock();
        match inner.items.pop_front() {
            Some(item) => Some((item, inner.cancel.clone())),
            None => {
                inner.state = QueueState::Idle;
                stats.exit();
                None
            }
        }
    }
}

/// 所有 guild 的队列集合
pub struct GuildPlaybackQueues {
    queues: DashMap<GuildKey, Arc<GuildQueue>>,
    processor: Arc<QueueProcessor>,
    stats: Arc<DrainStats>,
}

impl GuildPlaybackQueues {
    pub fn new(processor: Arc<QueueProcessor>) -> Self {
        Self {
            queues: DashMap::new(),
            processor,
            stats: Arc::new(DrainStats::default()),
        }
    }

    pub fn stats(&self) -> DrainStatsSnapshot {
        self.stats.snapshot()
    }

    fn queue(&self, guild: GuildKey) -> Option<Arc<GuildQueue>> {
        self.queues.get(&guild).map(|q| q.value().clone())
    }

    /// 消费循环，每个 guild 同时至多一个
    async fn drain(
        guild: GuildKey,
        queue: Arc<GuildQueue>,
        processor: Arc<QueueProcessor>,
        stats: Arc<DrainStats>,
    ) {
        tracing::debug!(guild_id = %guild, "Drain loop started");

        let mut processed = 0u64;
        let mut failed = 0u64;

        while let Some((item, cancel)) = queue.next(&stats) {
            match processor.process(&item, &cancel).await {
                Ok(ItemOutcome::Played) => {
                    processed += 1;
                    stats.processed.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!(
                        item_id = %item.id,
                        guild_id = %guild,
                        queued_ms = (chrono::Utc::now() - item.enqueued_at).num_milliseconds(),
                        "Item played"
                    );
                }
                Ok(ItemOutcome::Cancelled) => {
                    stats.cancelled.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!(item_id = %item.id, guild_id = %guild, "Item cancelled");
                }
                Err(e) => {
                    failed += 1;
                    stats.failed.fetch_add(1, Ordering::SeqCst);
                    tracing::error!(
                        item_id = %item.id,
                        guild_id = %guild,
                        error = %e,
                        "Failed to process queue item"
                    );
                }
            }
        }

        tracing::debug!(
            guild_id = %guild,
            processed = processed,
            failed = failed,
            "Drain loop idle"
        );
    }
}

impl PlaybackQueuePort for GuildPlaybackQueues {
    fn enqueue(&self, item: QueueItem) -> EnqueueOutcome {
        let guild = item.destination;
        let queue = self
            .queues
            .entry(guild)
            .or_insert_with(|| Arc::new(GuildQueue::new()))
            .value()
            .clone();

        let outcome = {
            let mut inner = queue.lock();
            inner.items.push_back(item);
            let started_drain = inner.state == QueueState::Idle;
            if started_drain {
                inner.state = QueueState::Draining;
                self.stats.enter();
            }
            EnqueueOutcome {
                pending: inner.items.len(),
                started_drain,
            }
        };

        if outcome.started_drain {
            tokio::spawn(Self::drain(
                guild,
                queue,
                self.processor.clone(),
                self.stats.clone(),
            ));
        }

        tracing::debug!(
            guild_id = %guild,
            pending = outcome.pending,
            started_drain = outcome.started_drain,
            "Item enqueued"
        );
        outcome
    }

    fn cancel(&self, guild: GuildKey) -> usize {
        let Some(queue) = self.queue(guild) else {
            return 0;
        };

        let mut inner = queue.lock();
        let dropped = inner.items.len();
        inner.items.clear();
        inner.cancel.cancel();
        // 之后入队的条目使用新的令牌
        inner.cancel = CancellationToken::new();
        drop(inner);

        tracing::info!(guild_id = %guild, dropped = dropped, "Playback queue cancelled");
        dropped
    }

    fn state(&self, guild: GuildKey) -> QueueState {
        self.queue(guild)
            .map(|q| q.lock().state)
            .unwrap_or(QueueState::Idle)
    }

    fn pending(&self, guild: GuildKey) -> usize {
        self.queue(guild).map(|q| q.lock().items.len()).unwrap_or(0)
    }
}
