//! Fake Voice Session - 用于测试的语音连接
//!
//! 记录每次播放，播放在若干次 `is_playing` 轮询后结束

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::super::tts::wav_probe::decode_pcm16_payload;
use crate::application::ports::{PlaybackFilter, VoiceError, VoiceSessionPort};
use crate::domain::{ChannelKey, GuildKey};

/// 一次播放的记录
#[derive(Debug, Clone)]
pub struct PlaybackRecord {
    pub guild: GuildKey,
    /// 从音频文件还原的文本
    pub text: String,
    pub filter: PlaybackFilter,
    pub source: PathBuf,
}

/// Fake Voice Session
pub struct FakeVoiceSession {
    connections: DashMap<GuildKey, ChannelKey>,
    /// guild -> 剩余轮询次数
    playing: DashMap<GuildKey, u32>,
    plays: Mutex<Vec<PlaybackRecord>>,
    play_polls: u32,
    /// 按 guild 覆盖的轮询次数
    guild_play_polls: DashMap<GuildKey, u32>,
    /// guild -> 上一次播放的源文件
    last_sources: DashMap<GuildKey, PathBuf>,
    stale_sources: AtomicUsize,
    fail_join: Mutex<Option<String>>,
    fail_play_texts: Mutex<HashSet<String>>,
    overlaps: AtomicUsize,
    stops: AtomicUsize,
}

impl FakeVoiceSession {
    pub fn new() -> Self {
        Self::with_play_polls(2)
    }

    /// 每次播放持续 `play_polls` 次轮询
    pub fn with_play_polls(play_polls: u32) -> Self {
        Self {
            connections: DashMap::new(),
            playing: DashMap::new(),
            plays: Mutex::new(Vec::new()),
            play_polls,
            guild_play_polls: DashMap::new(),
            last_sources: DashMap::new(),
            stale_sources: AtomicUsize::new(0),
            fail_join: Mutex::new(None),
            fail_play_texts: Mutex::new(HashSet::new()),
            overlaps: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    /// 该 guild 的每次播放持续 `play_polls` 次轮询
    pub fn set_play_polls(&self, guild: GuildKey, play_polls: u32) {
        self.guild_play_polls.insert(guild, play_polls);
    }

    /// 下一次 join 失败
    pub fn fail_next_join(&self, message: impl Into<String>) {
        *self.fail_join.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    /// 播放该文本时返回 PlaybackError
    pub fn fail_play_of(&self, text: impl Into<String>) {
        self.fail_play_texts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(text.into());
    }

    /// 按顺序返回所有成功开始的播放
    pub fn plays(&self) -> Vec<PlaybackRecord> {
        self.plays.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn played_texts(&self) -> Vec<String> {
        self.plays().into_iter().map(|p| p.text).collect()
    }

    /// 在上一条仍在播放时开始新播放的次数
    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    /// 同步查看连接状态
    pub fn connected(&self, guild: GuildKey) -> bool {
        self.connections.contains_key(&guild)
    }

    /// 开始播放时上一条的源文件仍然存在的次数
    pub fn stale_sources(&self) -> usize {
        self.stale_sources.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl Default for FakeVoiceSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceSessionPort for FakeVoiceSession {
    async fn join(&self, guild: GuildKey, channel: ChannelKey) -> Result<(), VoiceError> {
        let failure = self.fail_join.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(message) = failure {
            return Err(VoiceError::ConnectionError(message));
        }
        self.connections.insert(guild, channel);
        Ok(())
    }

    async fn leave(&self, guild: GuildKey) -> Result<(), VoiceError> {
        self.playing.remove(&guild);
        self.connections
            .remove(&guild)
            .map(|_| ())
            .ok_or(VoiceError::NotConnected(guild))
    }

    async fn is_connected(&self, guild: GuildKey) -> bool {
        self.connections.contains_key(&guild)
    }

    async fn play(
        &self,
        guild: GuildKey,
        source: &Path,
        filter: &PlaybackFilter,
    ) -> Result<(), VoiceError> {
        if !self.connections.contains_key(&guild) {
            return Err(VoiceError::NotConnected(guild));
        }

        let wav = tokio::fs::read(source)
            .await
            .map_err(|e| VoiceError::PlaybackError(format!("cannot read source: {}", e)))?;
        let payload = decode_pcm16_payload(&wav)
            .ok_or_else(|| VoiceError::PlaybackError("not a payload wav".to_string()))?;
        let text = String::from_utf8_lossy(&payload).into_owned();

        let previous = self.last_sources.insert(guild, source.to_path_buf());
        if previous.is_some_and(|p| p.exists()) {
            self.stale_sources.fetch_add(1, Ordering::SeqCst);
        }

        let refused = self
            .fail_play_texts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&text);
        if refused {
            return Err(VoiceError::PlaybackError(format!("refused: {}", text)));
        }

        if self.playing.contains_key(&guild) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let polls = self
            .guild_play_polls
            .get(&guild)
            .map(|p| *p)
            .unwrap_or(self.play_polls);
        self.playing.insert(guild, polls);

        self.plays
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PlaybackRecord {
                guild,
                text,
                filter: *filter,
                source: source.to_path_buf(),
            });
        Ok(())
    }

    async fn is_playing(&self, guild: GuildKey) -> bool {
        let still_playing = match self.playing.get_mut(&guild) {
            Some(mut remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            Some(_) => false,
            None => return false,
        };
        if !still_playing {
            self.playing.remove(&guild);
        }
        still_playing
    }

    async fn stop(&self, guild: GuildKey) {
        self.playing.remove(&guild);
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}
