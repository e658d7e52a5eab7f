//! Voice Adapter - 语音连接实现

mod fake_voice_session;
mod songbird_voice;

pub use fake_voice_session::{FakeVoiceSession, PlaybackRecord};
pub use songbird_voice::SongbirdVoice;
