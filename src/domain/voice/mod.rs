//! Voice Context - 读み上げ设置上下文
//!
//! 职责:
//! - 速度、话者等每个 guild 的设置
//! - 设置值的校验

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::VoiceState;
pub use errors::VoiceSettingError;
pub use value_objects::{ChannelKey, GuildKey, SpeakerId, Speed, MAX_SPEED, MIN_SPEED};
