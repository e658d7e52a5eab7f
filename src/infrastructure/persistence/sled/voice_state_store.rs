//! Sled-based Voice State Store Implementation

use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;

use crate::application::ports::{StateStoreError, VoiceStatePort};
use crate::domain::{GuildKey, SpeakerId, Speed, VoiceState};

/// 持久化条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredVoiceState {
    state: VoiceState,
    updated_at: i64,
}

/// Sled 设置存储
///
/// 重启后保留每个 guild 的速度与话者
pub struct SledVoiceStateStore {
    db: Db,
    defaults: VoiceState,
}

impl SledVoiceStateStore {
    /// 打开（或创建）数据库
    pub fn open<P: AsRef<Path>>(path: P, defaults: VoiceState) -> Result<Self, StateStoreError> {
        let db = sled::open(path.as_ref())
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %path.as_ref().display(),
            guilds = db.scan_prefix("voice:").count(),
            "SledVoiceStateStore initialized"
        );

        Ok(Self { db, defaults })
    }

    fn key(guild: GuildKey) -> String {
        format!("voice:{}", guild)
    }

    fn load(&self, guild: GuildKey) -> Result<Option<VoiceState>, StateStoreError> {
        let Some(value) = self
            .db
            .get(Self::key(guild))
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?
        else {
            return Ok(None);
        };

        Self::decode(&value).map(Some)
    }

    fn decode(bytes: &[u8]) -> Result<VoiceState, StateStoreError> {
        bincode::deserialize::<StoredVoiceState>(bytes)
            .map(|stored| stored.state)
            .map_err(|e| StateStoreError::SerializationError(e.to_string()))
    }

    fn encode(state: VoiceState) -> Result<Vec<u8>, StateStoreError> {
        let stored = StoredVoiceState {
            state,
            updated_at: chrono::Utc::now().timestamp(),
        };
        bincode::serialize(&stored).map_err(|e| StateStoreError::SerializationError(e.to_string()))
    }

    /// 原子读改写：并发的 speed / speaker 更新互不覆盖
    fn update(
        &self,
        guild: GuildKey,
        f: impl Fn(VoiceState) -> VoiceState,
    ) -> Result<VoiceState, StateStoreError> {
        // 闭包可能被 sled 重试多次，只保留最后一次的错误
        let mut failure: Option<StateStoreError> = None;

        let updated = self
            .db
            .update_and_fetch(Self::key(guild), |old| {
                failure = None;
                let current = match old.map(Self::decode).transpose() {
                    Ok(state) => state.unwrap_or(self.defaults),
                    Err(e) => {
                        failure = Some(e);
                        return old.map(|b| b.to_vec());
                    }
                };
                match Self::encode(f(current)) {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        failure = Some(e);
                        old.map(|b| b.to_vec())
                    }
                }
            })
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?;

        if let Some(e) = failure {
            return Err(e);
        }

        self.db
            .flush()
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?;

        match updated {
            Some(bytes) => Self::decode(&bytes),
            None => Err(StateStoreError::DatabaseError(format!(
                "voice state for guild {} vanished during update",
                guild
            ))),
        }
    }
}

impl VoiceStatePort for SledVoiceStateStore {
    fn get(&self, guild: GuildKey) -> VoiceState {
        match self.load(guild) {
            Ok(state) => state.unwrap_or(self.defaults),
            Err(e) => {
                tracing::warn!(guild_id = %guild, error = %e, "Failed to load voice state, using defaults");
                self.defaults
            }
        }
    }

    fn set_speed(&self, guild: GuildKey, speed: Speed) -> Result<VoiceState, StateStoreError> {
        let state = self.update(guild, |s| s.with_speed(speed))?;
        tracing::debug!(guild_id = %guild, speed = %speed, "Voice state speed persisted");
        Ok(state)
    }

    fn set_speaker(
        &self,
        guild: GuildKey,
        speaker: SpeakerId,
    ) -> Result<VoiceState, StateStoreError> {
        let state = self.update(guild, |s| s.with_speaker(speaker))?;
        tracing::debug!(guild_id = %guild, speaker = %speaker, "Voice state speaker persisted");
        Ok(state)
    }
}
