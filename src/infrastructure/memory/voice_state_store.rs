//! In-Memory Voice State Store Implementation

use dashmap::DashMap;

use crate::application::ports::{StateStoreError, VoiceStatePort};
use crate::domain::{GuildKey, SpeakerId, Speed, VoiceState};

/// 内存设置存储
pub struct InMemoryVoiceStateStore {
    states: DashMap<GuildKey, VoiceState>,
    defaults: VoiceState,
}

impl InMemoryVoiceStateStore {
    pub fn new(defaults: VoiceState) -> Self {
        Self {
            states: DashMap::new(),
            defaults,
        }
    }

    fn update(&self, guild: GuildKey, f: impl FnOnce(VoiceState) -> VoiceState) -> VoiceState {
        let mut entry = self.states.entry(guild).or_insert(self.defaults);
        *entry = f(*entry);
        *entry
    }
}

impl VoiceStatePort for InMemoryVoiceStateStore {
    fn get(&self, guild: GuildKey) -> VoiceState {
        self.states
            .get(&guild)
            .map(|s| *s)
            .unwrap_or(self.defaults)
    }

    fn set_speed(&self, guild: GuildKey, speed: Speed) -> Result<VoiceState, StateStoreError> {
        let state = self.update(guild, |s| s.with_speed(speed));
        tracing::debug!(guild_id = %guild, speed = %speed, "Voice state speed updated");
        Ok(state)
    }

    fn set_speaker(
        &self,
        guild: GuildKey,
        speaker: SpeakerId,
    ) -> Result<VoiceState, StateStoreError> {
        let state = self.update(guild, |s| s.with_speaker(speaker));
        tracing::debug!(guild_id = %guild, speaker = %speaker, "Voice state speaker updated");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guilds_are_independent() {
        let defaults = VoiceState::new(Speed::new(2.0).unwrap(), SpeakerId::new(1));
        let store = InMemoryVoiceStateStore::new(defaults);
        let a = GuildKey::new(1);
        let b = GuildKey::new(2);

        assert_eq!(store.get(a), defaults);

        store.set_speed(a, Speed::new(3.0).unwrap()).unwrap();
        store.set_speaker(a, SpeakerId::new(8)).unwrap();

        let state = store.get(a);
        assert_eq!(state.speed().value(), 3.0);
        assert_eq!(state.speaker(), SpeakerId::new(8));
        assert_eq!(store.get(b), defaults);
    }
}
