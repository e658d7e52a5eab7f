//! Voice Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{SpeakerId, Speed};

/// 每个 guild 的读み上げ设置
///
/// 不变量:
/// - speed 总在 [1.0, 3.0] 内（由 Speed 保证）
/// - 只由设置命令修改；合成时按值拷贝，后续修改不影响进行中的条目
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceState {
    speed: Speed,
    speaker: SpeakerId,
}

impl VoiceState {
    pub fn new(speed: Speed, speaker: SpeakerId) -> Self {
        Self { speed, speaker }
    }

    pub fn with_speed(self, speed: Speed) -> Self {
        Self { speed, ..self }
    }

    pub fn with_speaker(self, speaker: SpeakerId) -> Self {
        Self { speaker, ..self }
    }

    // Getters
    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn speaker(&self) -> SpeakerId {
        self.speaker
    }
}

impl Default for VoiceState {
    fn default() -> Self {
        Self {
            speed: Speed::default(),
            speaker: SpeakerId::new(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_speed_keeps_speaker() {
        let state = VoiceState::new(Speed::new(1.0).unwrap(), SpeakerId::new(8));
        let updated = state.with_speed(Speed::new(2.5).unwrap());

        assert_eq!(updated.speaker(), SpeakerId::new(8));
        assert_eq!(updated.speed().value(), 2.5);
        // 原值不受影响
        assert_eq!(state.speed().value(), 1.0);
    }
}
