//! Voice Command Handlers - 读み上げ设置

use std::sync::Arc;

use crate::application::commands::{SetSpeaker, SetSpeed, VoiceStateResponse};
use crate::application::error::ApplicationError;
use crate::application::ports::{SpeakerRegistryPort, VoiceStatePort};
use crate::domain::{SpeakerId, Speed, VoiceSettingError};

// ============================================================================
// SetSpeed
// ============================================================================

/// SetSpeed Handler
pub struct SetSpeedHandler {
    voice_state: Arc<dyn VoiceStatePort>,
}

impl SetSpeedHandler {
    pub fn new(voice_state: Arc<dyn VoiceStatePort>) -> Self {
        Self { voice_state }
    }

    pub fn handle(&self, command: SetSpeed) -> Result<VoiceStateResponse, ApplicationError> {
        let speed = Speed::new(command.speed)?;
        let state = self.voice_state.set_speed(command.guild, speed)?;

        tracing::info!(guild_id = %command.guild, speed = %speed, "Speed updated");

        Ok(VoiceStateResponse {
            guild: command.guild,
            state,
        })
    }
}

// ============================================================================
// SetSpeaker
// ============================================================================

/// SetSpeaker Handler
///
/// 只接受最近一次获取的话者集合中的 ID
pub struct SetSpeakerHandler {
    voice_state: Arc<dyn VoiceStatePort>,
    registry: Arc<dyn SpeakerRegistryPort>,
}

impl SetSpeakerHandler {
    pub fn new(voice_state: Arc<dyn VoiceStatePort>, registry: Arc<dyn SpeakerRegistryPort>) -> Self {
        Self {
            voice_state,
            registry,
        }
    }

    pub async fn handle(&self, command: SetSpeaker) -> Result<VoiceStateResponse, ApplicationError> {
        let speaker = SpeakerId::from_i64(command.speaker_id)?;

        if !self.registry.is_valid_id(speaker).await? {
            tracing::debug!(guild_id = %command.guild, speaker = %speaker, "Unknown speaker rejected");
            return Err(VoiceSettingError::UnknownSpeaker(command.speaker_id).into());
        }

        let state = self.voice_state.set_speaker(command.guild, speaker)?;

        tracing::info!(guild_id = %command.guild, speaker = %speaker, "Speaker updated");

        Ok(VoiceStateResponse {
            guild: command.guild,
            state,
        })
    }
}
