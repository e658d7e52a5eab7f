//! Songbird Voice - 基于 songbird 的语音连接适配器
//!
//! 播放流程: 临时 WAV -> AudioFilterPort (ffmpeg) -> f32le PCM -> RawAdapter -> Call

use async_trait::async_trait;
use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};
use songbird::input::{Input, RawAdapter};
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::Songbird;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    AudioFilterPort, PlaybackFilter, VoiceError, VoiceSessionPort, PCM_CHANNELS, PCM_SAMPLE_RATE,
};
use crate::domain::{ChannelKey, GuildKey};

/// Songbird 语音适配器
pub struct SongbirdVoice {
    manager: Arc<Songbird>,
    filter: Arc<dyn AudioFilterPort>,
    /// guild -> 当前播放的音轨
    tracks: DashMap<GuildKey, TrackHandle>,
}

impl SongbirdVoice {
    pub fn new(manager: Arc<Songbird>, filter: Arc<dyn AudioFilterPort>) -> Self {
        Self {
            manager,
            filter,
            tracks: DashMap::new(),
        }
    }
}

fn guild_id(guild: GuildKey) -> GuildId {
    GuildId::new(guild.get())
}

#[async_trait]
impl VoiceSessionPort for SongbirdVoice {
    async fn join(&self, guild: GuildKey, channel: ChannelKey) -> Result<(), VoiceError> {
        self.manager
            .join(guild_id(guild), ChannelId::new(channel.get()))
            .await
            .map_err(|e| VoiceError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    async fn leave(&self, guild: GuildKey) -> Result<(), VoiceError> {
        self.stop(guild).await;
        self.manager
            .remove(guild_id(guild))
            .await
            .map_err(|e| VoiceError::ConnectionError(e.to_string()))
    }

    async fn is_connected(&self, guild: GuildKey) -> bool {
        match self.manager.get(guild_id(guild)) {
            Some(call) => call.lock().await.current_connection().is_some(),
            None => false,
        }
    }

    async fn play(
        &self,
        guild: GuildKey,
        source: &Path,
        filter: &PlaybackFilter,
    ) -> Result<(), VoiceError> {
        let call = self
            .manager
            .get(guild_id(guild))
            .ok_or(VoiceError::NotConnected(guild))?;

        let pcm = self
            .filter
            .apply(source, filter)
            .await
            .map_err(|e| VoiceError::PlaybackError(e.to_string()))?;
        let pcm_len = pcm.len();

        let input: Input = RawAdapter::new(Cursor::new(pcm), PCM_SAMPLE_RATE, PCM_CHANNELS).into();
        let handle = {
            let mut handler = call.lock().await;
            handler.play_input(input)
        };
        self.tracks.insert(guild, handle);

        tracing::debug!(guild_id = %guild, pcm_bytes = pcm_len, "Playback started");
        Ok(())
    }

    async fn is_playing(&self, guild: GuildKey) -> bool {
        // 先克隆句柄，不跨 await 持有 DashMap 引用
        let handle = match self.tracks.get(&guild) {
            Some(handle) => handle.clone(),
            None => return false,
        };

        match handle.get_info().await {
            Ok(state) => matches!(state.playing, PlayMode::Play | PlayMode::Pause),
            // 音轨已结束并被驱动移除
            Err(_) => false,
        }
    }

    async fn stop(&self, guild: GuildKey) {
        if let Some((_, handle)) = self.tracks.remove(&guild) {
            if let Err(e) = handle.stop() {
                tracing::debug!(guild_id = %guild, error = %e, "Track already stopped");
            }
        }
    }
}
