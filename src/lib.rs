//! Yomiage - VOICEVOX 读み上げ Discord bot
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: guild、话者、速度与读み上げ设置
//! - Speech: 读み上げ队列条目
//! - Speaker Listing: 话者目录与分页
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, VoiceSession, AudioFilter, PlaybackQueue, VoiceState, SpeakerRegistry）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Discord: serenity 事件处理与 slash command
//! - Adapters: VOICEVOX Client, ffmpeg Filter, songbird Voice
//! - Memory: 设置存储与话者缓存的内存实现
//! - Worker: 每个 guild 的读み上げ队列与处理器
//! - Persistence: Sled 设置存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
