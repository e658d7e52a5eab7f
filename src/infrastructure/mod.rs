//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod discord;
pub mod memory;
pub mod persistence;
pub mod worker;

pub use discord::{BotHandler, BotHandlerConfig, BotHandlers};
pub use memory::{CachedSpeakerRegistry, InMemoryVoiceStateStore};
pub use persistence::SledVoiceStateStore;
pub use worker::{GuildPlaybackQueues, QueueProcessor, QueueProcessorConfig};
