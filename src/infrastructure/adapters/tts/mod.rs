//! TTS Adapter - VOICEVOX 客户端实现

mod fake_tts_client;
mod voicevox_client;
pub mod wav_probe;

pub use fake_tts_client::{FakeTtsClient, FakeTtsClientConfig, SynthesisCall};
pub use voicevox_client::{VoicevoxClient, VoicevoxClientConfig};
pub use wav_probe::{probe_wav, WavInfo};
