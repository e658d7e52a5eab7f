//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{SpeakerId, Speed, VoiceSettingError, VoiceState};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Discord 配置
    #[serde(default)]
    pub discord: DiscordConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 播放配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 读み上げ默认设置
    #[serde(default)]
    pub voice: VoiceConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// Discord 配置
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// bot token
    #[serde(default)]
    pub token: String,

    /// token 文件（首行为 token），`token` 为空时读取
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    /// 读み上げ对象文字频道名
    #[serde(default = "default_listen_channel")]
    pub listen_channel: String,

    /// 状态中显示的活动
    #[serde(default)]
    pub activity: Option<String>,
}

fn default_listen_channel() -> String {
    "聞き専".to_string()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            token_file: None,
            listen_channel: default_listen_channel(),
            activity: None,
        }
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// VOICEVOX 引擎基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_url() -> String {
    "http://localhost:50021".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// 音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// ffmpeg 可执行文件
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// 播放音量，(0, 1]
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// 临时音频文件目录
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_volume() -> f32 {
    0.7
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("yomiage")
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            volume: default_volume(),
            temp_dir: default_temp_dir(),
        }
    }
}

/// 播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// 播放状态轮询间隔（毫秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval() -> u64 {
    100
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl PlaybackConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// 读み上げ默认设置（未设置过的 guild 使用）
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_speed")]
    pub default_speed: f64,

    #[serde(default = "default_speaker")]
    pub default_speaker: u32,
}

fn default_speed() -> f64 {
    2.0
}

fn default_speaker() -> u32 {
    1
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            default_speed: default_speed(),
            default_speaker: default_speaker(),
        }
    }
}

impl VoiceConfig {
    /// 构造默认 VoiceState
    pub fn default_state(&self) -> Result<VoiceState, VoiceSettingError> {
        Ok(VoiceState::new(
            Speed::new(self.default_speed)?,
            SpeakerId::new(self.default_speaker),
        ))
    }
}

/// 存储配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// 设置持久化数据库路径，未设置时只保存在内存中
    #[serde(default)]
    pub state_db: Option<PathBuf>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
