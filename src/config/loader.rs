//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `YOMIAGE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `YOMIAGE_DISCORD__TOKEN=...`
/// - `YOMIAGE_DISCORD__LISTEN_CHANNEL=聞き専`
/// - `YOMIAGE_TTS__URL=http://voicevox:50021`
/// - `YOMIAGE_AUDIO__FFMPEG_PATH=/usr/bin/ffmpeg`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("discord.listen_channel", "聞き専")?
        .set_default("tts.url", "http://localhost:50021")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("audio.ffmpeg_path", "ffmpeg")?
        .set_default("audio.volume", 0.7)?
        .set_default("playback.poll_interval_ms", 100)?
        .set_default("voice.default_speed", 2.0)?
        .set_default("voice.default_speaker", 1)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: YOMIAGE_TTS__URL=http://voicevox:50021
    builder = builder.add_source(
        Environment::with_prefix("YOMIAGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    resolve_token(&mut app_config)?;
    validate_config(&app_config)?;

    Ok(app_config)
}

/// `discord.token` 为空时从 token 文件的首行读取
fn resolve_token(config: &mut AppConfig) -> Result<(), ConfigError> {
    if !config.discord.token.trim().is_empty() {
        return Ok(());
    }
    let Some(path) = &config.discord.token_file else {
        return Ok(());
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::LoadError(format!("Failed to read token file {}: {}", path.display(), e))
    })?;
    config.discord.token = content.lines().next().unwrap_or_default().trim().to_string();
    Ok(())
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.discord.token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Discord token cannot be empty".to_string(),
        ));
    }

    if config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.audio.ffmpeg_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "ffmpeg path cannot be empty".to_string(),
        ));
    }

    if !(config.audio.volume > 0.0 && config.audio.volume <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "Volume must be in (0, 1], got {}",
            config.audio.volume
        )));
    }

    config
        .voice
        .default_state()
        .map_err(|e| ConfigError::ValidationError(format!("Invalid default voice: {}", e)))?;

    if config.playback.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Poll interval cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Discord Token: {}", redact(&config.discord.token));
    tracing::info!("Listen Channel: {}", config.discord.listen_channel);
    tracing::info!("TTS URL: {}", config.tts.url);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("ffmpeg: {}", config.audio.ffmpeg_path);
    tracing::info!("Volume: {}", config.audio.volume);
    tracing::info!("Temp Directory: {:?}", config.audio.temp_dir);
    tracing::info!("Poll Interval: {}ms", config.playback.poll_interval_ms);
    tracing::info!(
        "Default Voice: speed={} speaker={}",
        config.voice.default_speed,
        config.voice.default_speaker
    );
    match &config.storage.state_db {
        Some(path) => tracing::info!("State DB: {:?}", path),
        None => tracing::info!("State DB: (in-memory)"),
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        "(unset)".to_string()
    } else {
        format!("***({} chars)", secret.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.discord.token = "token".to_string();
        config
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_token() {
        assert!(validate_config(&AppConfig::default()).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_tts_url() {
        let mut config = valid_config();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_volume() {
        for volume in [0.0, 1.5, f32::NAN] {
            let mut config = valid_config();
            config.audio.volume = volume;
            assert!(validate_config(&config).is_err());
        }
    }

    #[test]
    fn test_validation_error_for_default_speed() {
        let mut config = valid_config();
        config.voice.default_speed = 0.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_poll_interval() {
        let mut config = valid_config();
        config.playback.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[discord]\ntoken = \"abc\"\nlisten_channel = \"読み上げ\"\n\n[tts]\nurl = \"http://voicevox:50021\"\n\n[voice]\ndefault_speed = 1.5"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.discord.listen_channel, "読み上げ");
        assert_eq!(config.tts.url, "http://voicevox:50021");
        assert_eq!(config.voice.default_speed, 1.5);
        assert_eq!(config.audio.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn test_token_file_first_line() {
        let mut token_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(token_file, "secret-token\n/usr/bin/ffmpeg").unwrap();

        let mut config = AppConfig::default();
        config.discord.token_file = Some(token_file.path().to_path_buf());
        resolve_token(&mut config).unwrap();
        assert_eq!(config.discord.token, "secret-token");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact(""), "(unset)");
        assert_eq!(redact("abcd"), "***(4 chars)");
    }
}
