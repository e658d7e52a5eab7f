//! Cached Speaker Registry Implementation

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::application::ports::{
    flatten_speakers, SpeakerRegistryPort, TtsEnginePort, TtsError,
};
use crate::domain::{SpeakerCatalog, SpeakerId};

/// 带缓存的话者目录
///
/// `list_speakers` 总是重新获取；`is_valid_id` 使用最近一次获取的结果
pub struct CachedSpeakerRegistry {
    engine: Arc<dyn TtsEnginePort>,
    cache: RwLock<Option<SpeakerCatalog>>,
}

impl CachedSpeakerRegistry {
    pub fn new(engine: Arc<dyn TtsEnginePort>) -> Self {
        Self {
            engine,
            cache: RwLock::new(None),
        }
    }

    fn cached(&self) -> Option<SpeakerCatalog> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn store(&self, catalog: SpeakerCatalog) {
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = Some(catalog);
    }
}

#[async_trait]
impl SpeakerRegistryPort for CachedSpeakerRegistry {
    async fn list_speakers(&self) -> Result<SpeakerCatalog, TtsError> {
        let speakers = self.engine.speakers().await?;
        let catalog = SpeakerCatalog::new(flatten_speakers(&speakers));

        tracing::info!(
            speakers = speakers.len(),
            styles = catalog.len(),
            "Speaker registry refreshed"
        );

        self.store(catalog.clone());
        Ok(catalog)
    }

    async fn is_valid_id(&self, id: SpeakerId) -> Result<bool, TtsError> {
        let catalog = match self.cached() {
            Some(catalog) => catalog,
            None => self.list_speakers().await?,
        };
        Ok(catalog.contains(id))
    }

    fn invalidate(&self) {
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = None;
        tracing::debug!("Speaker registry invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{EngineSpeaker, EngineStyle, SynthesisParameters};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录 /speakers 调用次数的引擎
    struct CountingEngine {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl TtsEnginePort for CountingEngine {
        async fn version(&self) -> Result<String, TtsError> {
            Ok("test".to_string())
        }

        async fn speakers(&self) -> Result<Vec<EngineSpeaker>, TtsError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![EngineSpeaker {
                name: "春日部つむぎ".to_string(),
                speaker_uuid: None,
                styles: vec![EngineStyle {
                    id: 8,
                    name: "ノーマル".to_string(),
                }],
            }])
        }

        async fn build_parameters(
            &self,
            _text: &str,
            _speaker: SpeakerId,
        ) -> Result<SynthesisParameters, TtsError> {
            Err(TtsError::EngineUnavailable("unused".to_string()))
        }

        async fn render(
            &self,
            _params: SynthesisParameters,
            _speaker: SpeakerId,
        ) -> Result<Vec<u8>, TtsError> {
            Err(TtsError::EngineUnavailable("unused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_validity_uses_cache_until_invalidated() {
        let engine = Arc::new(CountingEngine {
            fetches: AtomicUsize::new(0),
        });
        let registry = CachedSpeakerRegistry::new(engine.clone());

        assert!(registry.is_valid_id(SpeakerId::new(8)).await.unwrap());
        assert!(!registry.is_valid_id(SpeakerId::new(1)).await.unwrap());
        assert_eq!(engine.fetches.load(Ordering::SeqCst), 1);

        // list_speakers 总是重新获取
        registry.list_speakers().await.unwrap();
        assert_eq!(engine.fetches.load(Ordering::SeqCst), 2);

        registry.invalidate();
        assert!(registry.is_valid_id(SpeakerId::new(8)).await.unwrap());
        assert_eq!(engine.fetches.load(Ordering::SeqCst), 3);
    }
}
