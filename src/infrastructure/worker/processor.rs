//! Queue Processor - 处理单个读み上げ条目
//!
//! 合成 → 临时文件 → 播放 → 轮询直到结束 → 删除文件

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::artifact::AudioArtifact;
use crate::application::ports::{
    PlaybackFilter, TtsEnginePort, TtsError, VoiceError, VoiceSessionPort, VoiceStatePort,
    DEFAULT_VOLUME,
};
use crate::domain::{GuildKey, QueueItem};

/// 条目处理错误
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    #[error("Audio artifact error: {0}")]
    Artifact(#[from] std::io::Error),

    #[error("Playback failed: {0}")]
    Playback(#[from] VoiceError),
}

/// 条目处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// 播放到结束
    Played,
    /// 被 leave 中止
    Cancelled,
}

/// Processor 配置
#[derive(Debug, Clone)]
pub struct QueueProcessorConfig {
    /// 临时音频文件目录
    pub temp_dir: PathBuf,
    /// 播放音量
    pub volume: f32,
    /// 播放状态轮询间隔
    pub poll_interval: Duration,
}

impl Default for QueueProcessorConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("yomiage"),
            volume: DEFAULT_VOLUME,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// 队列处理器
///
/// 被每个 guild 的消费循环共享，自身无状态
pub struct QueueProcessor {
    config: QueueProcessorConfig,
    tts_engine: Arc<dyn TtsEnginePort>,
    voice: Arc<dyn VoiceSessionPort>,
    voice_state: Arc<dyn VoiceStatePort>,
}

impl QueueProcessor {
    pub fn new(
        config: QueueProcessorConfig,
        tts_engine: Arc<dyn TtsEnginePort>,
        voice: Arc<dyn VoiceSessionPort>,
        voice_state: Arc<dyn VoiceStatePort>,
    ) -> Self {
        Self {
            config,
            tts_engine,
            voice,
            voice_state,
        }
    }

    /// 处理单个条目，返回时该条目的临时文件已删除
    pub async fn process(
        &self,
        item: &QueueItem,
        cancel: &CancellationToken,
    ) -> Result<ItemOutcome, ItemError> {
        let guild = item.destination;

        // 开始时取快照，之后的设置变更只影响下一条
        let state = self.voice_state.get(guild);
        let speaker = state.speaker();

        let params = tokio::select! {
            _ = cancel.cancelled() => return Ok(ItemOutcome::Cancelled),
            result = self.tts_engine.build_parameters(&item.text, speaker) => result?,
        };

        let wav = tokio::select! {
            _ = cancel.cancelled() => return Ok(ItemOutcome::Cancelled),
            result = self.tts_engine.render(params, speaker) => result?,
        };

        let artifact = AudioArtifact::create(&self.config.temp_dir, &wav)?;
        tracing::debug!(
            item_id = %item.id,
            guild_id = %guild,
            path = %artifact.path().display(),
            bytes = artifact.len(),
            "Audio artifact written"
        );

        let filter = PlaybackFilter::new(state.speed().value(), self.config.volume);
        let outcome = self.play_until_done(guild, &artifact, &filter, cancel).await;

        if let Err(e) = artifact.close() {
            tracing::warn!(item_id = %item.id, error = %e, "Failed to remove audio artifact");
        }

        outcome
    }

    async fn play_until_done(
        &self,
        guild: GuildKey,
        artifact: &AudioArtifact,
        filter: &PlaybackFilter,
        cancel: &CancellationToken,
    ) -> Result<ItemOutcome, ItemError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                self.voice.stop(guild).await;
                return Ok(ItemOutcome::Cancelled);
            }
            result = self.voice.play(guild, artifact.path(), filter) => result?,
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.voice.stop(guild).await;
                    return Ok(ItemOutcome::Cancelled);
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            if !self.voice.is_playing(guild).await {
                return Ok(ItemOutcome::Played);
            }
        }
    }
}
