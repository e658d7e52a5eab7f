//! Sled 嵌入式存储

mod voice_state_store;

pub use voice_state_store::SledVoiceStateStore;
