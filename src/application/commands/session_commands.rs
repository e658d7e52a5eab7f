//! Session Commands - 语音连接与读み上げ命令

use crate::domain::{ChannelKey, GuildKey};

/// 加入命令
///
/// `channel` 为调用者当前所在的语音频道，不在频道中时为 None
#[derive(Debug, Clone)]
pub struct JoinVoice {
    pub guild: GuildKey,
    pub channel: Option<ChannelKey>,
    pub channel_name: String,
}

/// 加入响应
#[derive(Debug, Clone)]
pub struct JoinVoiceResponse {
    pub channel: ChannelKey,
    pub channel_name: String,
}

/// 离开命令
#[derive(Debug, Clone)]
pub struct LeaveVoice {
    pub guild: GuildKey,
}

/// 离开响应
#[derive(Debug, Clone)]
pub struct LeaveVoiceResponse {
    /// 被丢弃的待读み上げ条目数
    pub dropped: usize,
}

/// 读み上げ消息命令
#[derive(Debug, Clone)]
pub struct SpeakMessage {
    pub guild: GuildKey,
    pub text: String,
}

/// 读み上げ消息响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakMessageResponse {
    /// 已入队
    Queued { pending: usize, started_drain: bool },
    /// 没有语音连接或文本为空，忽略
    Ignored,
}
