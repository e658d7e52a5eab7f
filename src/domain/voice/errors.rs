//! Voice Context - Errors

use thiserror::Error;

/// 语音设置错误
///
/// 消息直接作为命令回复展示给用户
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VoiceSettingError {
    #[error("速度は1.0から3.0の間で指定してください。")]
    SpeedOutOfRange(f64),

    #[error("話者ID {0} は存在しません。")]
    UnknownSpeaker(i64),
}
