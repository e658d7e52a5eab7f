//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_filter;
mod playback_queue;
mod speaker_registry;
mod tts_engine;
mod voice_session;
mod voice_state;

pub use audio_filter::{
    AudioFilterPort, FilterError, PlaybackFilter, DEFAULT_VOLUME, PCM_CHANNELS, PCM_SAMPLE_RATE,
};
pub use playback_queue::{EnqueueOutcome, PlaybackQueuePort, QueueState};
pub use speaker_registry::SpeakerRegistryPort;
pub use tts_engine::{
    flatten_speakers, EngineSpeaker, EngineStyle, SynthesisParameters, TtsEnginePort, TtsError,
};
pub use voice_session::{VoiceError, VoiceSessionPort};
pub use voice_state::{StateStoreError, VoiceStatePort};
