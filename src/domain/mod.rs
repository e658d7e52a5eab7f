//! Domain Layer - 领域层
//!
//! 包含:
//! - Voice Context: 每个 guild 的读み上げ设置
//! - 队列条目
//! - 话者列表与分页

pub mod speaker_listing;
pub mod speech;
pub mod voice;

pub use speaker_listing::{paginate, SpeakerCatalog, SpeakerEntry, DEFAULT_PAGE_CHARS};
pub use speech::QueueItem;
pub use voice::{ChannelKey, GuildKey, SpeakerId, Speed, VoiceSettingError, VoiceState};
