//! Memory Layer - In-Memory State Management
//!
//! 实现每个 guild 的设置存储和带缓存的话者目录

mod speaker_registry;
mod voice_state_store;

pub use speaker_registry::CachedSpeakerRegistry;
pub use voice_state_store::InMemoryVoiceStateStore;
