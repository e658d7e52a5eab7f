//! Speaker Registry Port - 话者目录

use async_trait::async_trait;

use super::TtsError;
use crate::domain::{SpeakerCatalog, SpeakerId};

/// Speaker Registry Port
#[async_trait]
pub trait SpeakerRegistryPort: Send + Sync {
    /// 从引擎重新获取话者列表（同时刷新缓存）
    async fn list_speakers(&self) -> Result<SpeakerCatalog, TtsError>;

    /// ID 是否属于最近一次获取的话者集合；缓存为空时先获取
    async fn is_valid_id(&self, id: SpeakerId) -> Result<bool, TtsError>;

    /// 清空缓存
    fn invalidate(&self);
}
