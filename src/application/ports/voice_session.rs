//! Voice Session Port - 语音连接抽象
//!
//! 每个 guild 至多一个连接，一个连接同时只播放一条音频

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use super::PlaybackFilter;
use crate::domain::{ChannelKey, GuildKey};

/// 语音连接错误
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Voice connection error: {0}")]
    ConnectionError(String),

    #[error("Not connected to a voice channel in guild {0}")]
    NotConnected(GuildKey),

    #[error("Playback error: {0}")]
    PlaybackError(String),
}

/// Voice Session Port
#[async_trait]
pub trait VoiceSessionPort: Send + Sync {
    /// 加入语音频道
    async fn join(&self, guild: GuildKey, channel: ChannelKey) -> Result<(), VoiceError>;

    /// 离开语音频道（同时停止播放）
    async fn leave(&self, guild: GuildKey) -> Result<(), VoiceError>;

    /// 是否持有该 guild 的语音连接
    async fn is_connected(&self, guild: GuildKey) -> bool;

    /// 开始播放音频文件；返回时播放已开始，不等待结束
    async fn play(
        &self,
        guild: GuildKey,
        source: &Path,
        filter: &PlaybackFilter,
    ) -> Result<(), VoiceError>;

    /// 是否仍在播放
    async fn is_playing(&self, guild: GuildKey) -> bool;

    /// 停止当前播放
    async fn stop(&self, guild: GuildKey);
}
