//! Worker Layer - Background Playback Processing
//!
//! 每个 guild 的读み上げ队列与条目处理器

mod artifact;
mod playback_queue;
mod processor;

pub use artifact::AudioArtifact;
pub use playback_queue::{DrainStats, DrainStatsSnapshot, GuildPlaybackQueues};
pub use processor::{ItemError, ItemOutcome, QueueProcessor, QueueProcessorConfig};
