//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、VoiceSession、PlaybackQueue、VoiceState 等）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Session commands
    JoinVoice,
    JoinVoiceResponse,
    LeaveVoice,
    LeaveVoiceResponse,
    SpeakMessage,
    SpeakMessageResponse,
    // Voice commands
    SetSpeaker,
    SetSpeed,
    VoiceStateResponse,
    // Handlers
    handlers::{
        JoinVoiceHandler, LeaveVoiceHandler, SetSpeakerHandler, SetSpeedHandler,
        SpeakMessageHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Audio filter
    AudioFilterPort,
    FilterError,
    PlaybackFilter,
    // Playback queue
    EnqueueOutcome,
    PlaybackQueuePort,
    QueueState,
    // Speaker registry
    SpeakerRegistryPort,
    // TTS engine
    EngineSpeaker,
    SynthesisParameters,
    TtsEnginePort,
    TtsError,
    // Voice session
    VoiceError,
    VoiceSessionPort,
    // Voice state
    StateStoreError,
    VoiceStatePort,
};

pub use queries::{
    handlers::{ListSpeakersHandler, SpeakerListResponse},
    ListSpeakers,
};
