//! Voice State Port - 每个 guild 的读み上げ设置存储
//!
//! 定义设置存储的抽象接口，具体实现在 infrastructure/memory 与 persistence 层

use thiserror::Error;

use crate::domain::{GuildKey, SpeakerId, Speed, VoiceState};

/// 设置存储错误
#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Voice State Port
///
/// 读取永远成功：未设置过的 guild 返回默认值。写入是单次赋值，后写者胜
pub trait VoiceStatePort: Send + Sync {
    /// 获取当前设置（按值返回，调用方持有快照）
    fn get(&self, guild: GuildKey) -> VoiceState;

    /// 更新速度，返回更新后的设置
    fn set_speed(&self, guild: GuildKey, speed: Speed) -> Result<VoiceState, StateStoreError>;

    /// 更新话者，返回更新后的设置
    fn set_speaker(&self, guild: GuildKey, speaker: SpeakerId)
        -> Result<VoiceState, StateStoreError>;
}
