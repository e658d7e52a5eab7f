//! Yomiage - VOICEVOX 读み上げ Discord bot
//!
//! 启动顺序：配置 → 日志 → 引擎健康检查 → 适配器 → 队列 → 命令处理器 → Discord 网关

use serenity::all::GatewayIntents;
use serenity::Client;
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;

use yomiage::application::ports::{
    AudioFilterPort, PlaybackQueuePort, SpeakerRegistryPort, TtsEnginePort, VoiceSessionPort,
    VoiceStatePort,
};
use yomiage::application::{
    JoinVoiceHandler, LeaveVoiceHandler, ListSpeakersHandler, SetSpeakerHandler, SetSpeedHandler,
    SpeakMessageHandler,
};
use yomiage::config::{load_config, print_config, AppConfig};
use yomiage::infrastructure::adapters::{
    FfmpegFilter, SongbirdVoice, VoicevoxClient, VoicevoxClientConfig,
};
use yomiage::infrastructure::{
    BotHandler, BotHandlerConfig, BotHandlers, CachedSpeakerRegistry, GuildPlaybackQueues,
    InMemoryVoiceStateStore, QueueProcessor, QueueProcessorConfig, SledVoiceStateStore,
};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},yomiage={},serenity=warn,songbird=warn",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Yomiage - VOICEVOX 読み上げ bot");
    print_config(&config);

    // 创建 VOICEVOX 引擎客户端，启动前确认引擎可用
    let tts_config =
        VoicevoxClientConfig::new(config.tts.url.clone()).with_timeout(config.tts.timeout_secs);
    let tts_engine: Arc<dyn TtsEnginePort> = Arc::new(VoicevoxClient::new(tts_config)?);
    match tts_engine.version().await {
        Ok(version) => tracing::info!(version = %version, "VOICEVOX engine reachable"),
        Err(e) => {
            tracing::error!(url = %config.tts.url, error = %e, "VOICEVOX engine health check failed");
            return Err(anyhow::anyhow!("VOICEVOX engine unavailable: {}", e));
        }
    }

    // 读み上げ设置存储
    let defaults = config.voice.default_state()?;
    let voice_state: Arc<dyn VoiceStatePort> = match &config.storage.state_db {
        Some(path) => Arc::new(SledVoiceStateStore::open(path, defaults)?),
        None => Arc::new(InMemoryVoiceStateStore::new(defaults)),
    };

    let registry: Arc<dyn SpeakerRegistryPort> =
        Arc::new(CachedSpeakerRegistry::new(tts_engine.clone()));

    // 语音：songbird + ffmpeg 变换
    let songbird = Songbird::serenity();
    let filter: Arc<dyn AudioFilterPort> =
        Arc::new(FfmpegFilter::new(config.audio.ffmpeg_path.clone()));
    let voice: Arc<dyn VoiceSessionPort> = Arc::new(SongbirdVoice::new(songbird.clone(), filter));

    // 读み上げ队列
    tokio::fs::create_dir_all(&config.audio.temp_dir).await?;
    let processor = QueueProcessor::new(
        QueueProcessorConfig {
            temp_dir: config.audio.temp_dir.clone(),
            volume: config.audio.volume,
            poll_interval: config.playback.poll_interval(),
        },
        tts_engine.clone(),
        voice.clone(),
        voice_state.clone(),
    );
    let queue: Arc<dyn PlaybackQueuePort> =
        Arc::new(GuildPlaybackQueues::new(Arc::new(processor)));

    // 命令处理器
    let handlers = Arc::new(BotHandlers {
        join: JoinVoiceHandler::new(voice.clone()),
        leave: LeaveVoiceHandler::new(voice.clone(), queue.clone()),
        set_speed: SetSpeedHandler::new(voice_state.clone()),
        set_speaker: SetSpeakerHandler::new(voice_state.clone(), registry.clone()),
        list_speakers: ListSpeakersHandler::new(registry),
        speak: SpeakMessageHandler::new(voice, queue),
    });
    let handler = BotHandler::new(
        BotHandlerConfig {
            listen_channel: config.discord.listen_channel.clone(),
            activity: config.discord.activity.clone(),
        },
        handlers,
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = Client::builder(&config.discord.token, intents)
        .event_handler(handler)
        .register_songbird_with(songbird)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            return;
        }
        tracing::info!("Received shutdown signal");
        shard_manager.shutdown_all().await;
    });

    tracing::info!("Connecting to Discord gateway...");
    client.start().await?;

    tracing::info!("Bot shutdown complete");

    Ok(())
}
