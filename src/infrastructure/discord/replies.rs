//! 命令回复文本
//!
//! 把命令结果映射为展示给用户的日语消息

use crate::application::{
    ApplicationError, JoinVoiceResponse, LeaveVoiceResponse, SpeakerListResponse,
    VoiceStateResponse,
};

pub const GUILD_ONLY: &str = "サーバー内で使用してください。";
pub const NO_SPEAKERS: &str = "話者が見つかりませんでした。";

fn failure(command: &str, err: ApplicationError) -> String {
    tracing::warn!(command = command, error = %err, "Command failed");
    err.user_message()
}

pub fn join(result: Result<JoinVoiceResponse, ApplicationError>) -> String {
    match result {
        Ok(response) => format!("{}に参加しました。", response.channel_name),
        Err(e) => failure("join", e),
    }
}

pub fn leave(result: Result<LeaveVoiceResponse, ApplicationError>) -> String {
    match result {
        Ok(_) => "ボイスチャンネルから退出しました。".to_string(),
        Err(e) => failure("leave", e),
    }
}

pub fn speed(result: Result<VoiceStateResponse, ApplicationError>) -> String {
    match result {
        Ok(response) => format!("読み上げ速度を{}に設定しました。", response.state.speed()),
        Err(e) => failure("speed", e),
    }
}

pub fn speaker(result: Result<VoiceStateResponse, ApplicationError>) -> String {
    match result {
        Ok(response) => format!("話者を{}に設定しました。", response.state.speaker()),
        Err(e) => failure("speaker", e),
    }
}

/// 话者列表：每页一条消息
pub fn speakers(result: Result<SpeakerListResponse, ApplicationError>) -> Vec<String> {
    match result {
        Ok(response) if response.pages.is_empty() => vec![NO_SPEAKERS.to_string()],
        Ok(response) => response.pages,
        Err(e) => vec![failure("speakers", e)],
    }
}

/// 缺少必填参数（Discord 端已校验，正常不会出现）
pub fn missing_option(name: &str) -> String {
    failure(
        "option",
        ApplicationError::validation(format!("{} を指定してください。", name)),
    )
}
