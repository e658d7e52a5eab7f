//! 读み上げ队列条目

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::voice::GuildKey;

/// 待读み上げ的文本
///
/// 收到消息时创建，播放完成或失败后丢弃；只属于队列
#[derive(Debug, Clone)]
pub struct QueueItem {
    pub id: Uuid,
    pub text: String,
    pub destination: GuildKey,
    pub enqueued_at: DateTime<Utc>,
}

impl QueueItem {
    pub fn new(destination: GuildKey, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            destination,
            enqueued_at: Utc::now(),
        }
    }
}
