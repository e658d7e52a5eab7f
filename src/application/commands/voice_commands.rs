//! Voice Commands - 读み上げ设置命令

use crate::domain::{GuildKey, VoiceState};

/// 设置速度命令
#[derive(Debug, Clone)]
pub struct SetSpeed {
    pub guild: GuildKey,
    pub speed: f64,
}

/// 设置话者命令
#[derive(Debug, Clone)]
pub struct SetSpeaker {
    pub guild: GuildKey,
    pub speaker_id: i64,
}

/// 设置更新响应
#[derive(Debug, Clone)]
pub struct VoiceStateResponse {
    pub guild: GuildKey,
    pub state: VoiceState,
}
