//! Audio Filter Port - 播放前的音频变换
//!
//! 把合成的 WAV 变速、调整音量并解码为播放用的 PCM

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 固定音量衰减
pub const DEFAULT_VOLUME: f32 = 0.7;

/// 输出 PCM 采样率（Discord 语音固定 48kHz）
pub const PCM_SAMPLE_RATE: u32 = 48_000;

/// 输出 PCM 声道数
pub const PCM_CHANNELS: u32 = 2;

/// 音频变换错误
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Failed to spawn audio processor: {0}")]
    SpawnError(String),

    #[error("Audio processor exited with {status}: {stderr}")]
    ProcessError { status: String, stderr: String },

    #[error("Audio processor produced no output")]
    EmptyOutput,
}

/// 播放变换参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackFilter {
    /// 播放速率倍数（来自 VoiceState.speed）
    pub tempo: f32,
    /// 音量倍数
    pub volume: f32,
}

impl PlaybackFilter {
    pub fn new(tempo: f32, volume: f32) -> Self {
        Self { tempo, volume }
    }

    /// ffmpeg `-filter:a` 参数
    pub fn to_filter_graph(&self) -> String {
        format!("atempo={},volume={}", self.tempo, self.volume)
    }
}

impl Default for PlaybackFilter {
    fn default() -> Self {
        Self {
            tempo: 1.0,
            volume: DEFAULT_VOLUME,
        }
    }
}

/// Audio Filter Port
#[async_trait]
pub trait AudioFilterPort: Send + Sync {
    /// 读取 `source` 并输出交错的 f32le PCM（48kHz 双声道）
    async fn apply(&self, source: &Path, filter: &PlaybackFilter) -> Result<Vec<u8>, FilterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_graph() {
        let filter = PlaybackFilter::new(2.0, 0.7);
        assert_eq!(filter.to_filter_graph(), "atempo=2,volume=0.7");

        let filter = PlaybackFilter::new(1.5, DEFAULT_VOLUME);
        assert_eq!(filter.to_filter_graph(), "atempo=1.5,volume=0.7");
    }
}
