//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

use super::VoiceSettingError;

/// 读み上げ速度下限
pub const MIN_SPEED: f32 = 1.0;
/// 读み上げ速度上限
pub const MAX_SPEED: f32 = 3.0;

/// 服务器（guild）唯一标识
///
/// 每个 guild 至多一个语音连接，所以它同时也是语音会话的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuildKey(u64);

impl GuildKey {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GuildKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 语音频道唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelKey(u64);

impl ChannelKey {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 播放速度
///
/// 不变量: 1.0 <= speed <= 3.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Speed(f32);

impl Speed {
    pub fn new(value: f64) -> Result<Self, VoiceSettingError> {
        if !value.is_finite() || value < MIN_SPEED as f64 || value > MAX_SPEED as f64 {
            return Err(VoiceSettingError::SpeedOutOfRange(value));
        }
        Ok(Self(value as f32))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(MIN_SPEED)
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 整数值保留一位小数："2.0" 而不是 "2"
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// 引擎中的话者（style）ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeakerId(u32);

impl SpeakerId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// 来自用户输入的整数，负数或越界直接拒绝
    pub fn from_i64(id: i64) -> Result<Self, VoiceSettingError> {
        u32::try_from(id)
            .map(Self)
            .map_err(|_| VoiceSettingError::UnknownSpeaker(id))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_bounds() {
        assert!(Speed::new(0.9).is_err());
        assert!(Speed::new(3.1).is_err());
        assert!(Speed::new(f64::NAN).is_err());

        for v in [1.0, 2.0, 3.0] {
            let speed = Speed::new(v).unwrap();
            assert_eq!(speed.value(), v as f32);
        }
    }

    #[test]
    fn test_speed_display() {
        assert_eq!(Speed::new(2.0).unwrap().to_string(), "2.0");
        assert_eq!(Speed::new(2.5).unwrap().to_string(), "2.5");
        assert_eq!(Speed::new(1.25).unwrap().to_string(), "1.25");
    }

    #[test]
    fn test_speaker_from_i64() {
        assert_eq!(SpeakerId::from_i64(3).unwrap(), SpeakerId::new(3));
        assert!(SpeakerId::from_i64(-1).is_err());
        assert!(SpeakerId::from_i64(i64::from(u32::MAX) + 1).is_err());
    }
}
