//! Speaker Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SpeakerRegistryPort;
use crate::application::queries::ListSpeakers;
use crate::domain::paginate;

/// 话者列表响应
#[derive(Debug, Clone)]
pub struct SpeakerListResponse {
    /// 按顺序发送的消息页
    pub pages: Vec<String>,
    /// 话者（声线）总数
    pub total: usize,
}

/// ListSpeakers Handler
///
/// 每次都从引擎重新获取，顺带刷新 `speaker` 命令使用的缓存
pub struct ListSpeakersHandler {
    registry: Arc<dyn SpeakerRegistryPort>,
}

impl ListSpeakersHandler {
    pub fn new(registry: Arc<dyn SpeakerRegistryPort>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, query: ListSpeakers) -> Result<SpeakerListResponse, ApplicationError> {
        let catalog = match self.registry.list_speakers().await {
            Ok(catalog) => catalog,
            Err(e) => {
                // 引擎侧话者可能已变化，下次 speaker 命令重新获取
                self.registry.invalidate();
                tracing::warn!(error = %e, "Failed to list speakers, registry invalidated");
                return Err(e.into());
            }
        };
        let lines = catalog.lines();
        let pages = paginate(&lines, query.page_chars);

        tracing::debug!(total = catalog.len(), pages = pages.len(), "Speakers listed");

        Ok(SpeakerListResponse {
            pages,
            total: catalog.len(),
        })
    }
}
