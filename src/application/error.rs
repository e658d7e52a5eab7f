//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{StateStoreError, TtsError, VoiceError};
use crate::domain::VoiceSettingError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 用户输入不合法（消息可直接展示）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 调用者不在语音频道中
    #[error("Caller is not in a voice channel")]
    UserNotInVoice,

    /// bot 没有语音连接
    #[error("Bot is not connected to a voice channel")]
    NotConnected,

    /// 加入/离开语音频道失败
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 命令回复中展示给用户的文本
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationError(msg) => msg.clone(),
            Self::UserNotInVoice => "ボイスチャンネルに参加してください。".to_string(),
            Self::NotConnected => "ボイスチャンネルに接続していません。".to_string(),
            Self::ConnectionError(msg) => format!("エラーが発生しました: {}", msg),
            Self::ExternalServiceError(msg) => {
                format!("音声エンジンとの通信に失敗しました: {}", msg)
            }
            Self::StorageError(_) | Self::InternalError(_) => {
                "内部エラーが発生しました。".to_string()
            }
        }
    }
}

impl From<VoiceSettingError> for ApplicationError {
    fn from(err: VoiceSettingError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<StateStoreError> for ApplicationError {
    fn from(err: StateStoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::NotConnected(_) => Self::NotConnected,
            VoiceError::ConnectionError(msg) => Self::ConnectionError(msg),
            VoiceError::PlaybackError(msg) => Self::InternalError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_error_message_is_shown_verbatim() {
        let err: ApplicationError = VoiceSettingError::SpeedOutOfRange(3.1).into();
        assert_eq!(err.user_message(), "速度は1.0から3.0の間で指定してください。");
    }

    #[test]
    fn test_connection_error_message() {
        let err: ApplicationError = VoiceError::ConnectionError("timeout".to_string()).into();
        assert_eq!(err.user_message(), "エラーが発生しました: timeout");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = ApplicationError::internal("mutex poisoned");
        assert!(!err.user_message().contains("mutex"));
    }
}
