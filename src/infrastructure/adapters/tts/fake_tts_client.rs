//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 不调用引擎：合成结果是把文本原样写进采样数据的 WAV，播放端可以据此还原文本

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use super::wav_probe::encode_pcm16_wav;
use crate::application::ports::{
    EngineSpeaker, EngineStyle, SynthesisParameters, TtsEnginePort, TtsError,
};
use crate::domain::SpeakerId;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 返回的话者列表
    pub speakers: Vec<EngineSpeaker>,
    /// 每次调用的模拟延迟（毫秒）
    pub latency_ms: u64,
    /// 合成这些文本时返回 SynthesisFailed
    pub fail_texts: HashSet<String>,
    /// 采样率
    pub sample_rate: u32,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        let style = |id, name: &str| EngineStyle {
            id,
            name: name.to_string(),
        };
        Self {
            speakers: vec![
                EngineSpeaker {
                    name: "四国めたん".to_string(),
                    speaker_uuid: None,
                    styles: vec![style(2, "ノーマル"), style(0, "あまあま")],
                },
                EngineSpeaker {
                    name: "ずんだもん".to_string(),
                    speaker_uuid: None,
                    styles: vec![style(3, "ノーマル"), style(1, "あまあま")],
                },
            ],
            latency_ms: 0,
            fail_texts: HashSet::new(),
            sample_rate: 24_000,
        }
    }
}

impl FakeTtsClientConfig {
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.fail_texts.insert(text.into());
        self
    }

    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = ms;
        self
    }
}

/// 一次合成调用的记录
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisCall {
    pub text: String,
    pub speaker: SpeakerId,
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    calls: Mutex<Vec<SynthesisCall>>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        Self {
            config,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 按顺序返回所有 render 调用
    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    fn is_known(&self, speaker: SpeakerId) -> bool {
        self.config
            .speakers
            .iter()
            .flat_map(|s| s.styles.iter())
            .any(|style| style.id == speaker.get())
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn version(&self) -> Result<String, TtsError> {
        Ok("fake".to_string())
    }

    async fn speakers(&self) -> Result<Vec<EngineSpeaker>, TtsError> {
        self.simulate_latency().await;
        Ok(self.config.speakers.clone())
    }

    async fn build_parameters(
        &self,
        text: &str,
        speaker: SpeakerId,
    ) -> Result<SynthesisParameters, TtsError> {
        self.simulate_latency().await;
        if !self.is_known(speaker) {
            return Err(TtsError::InvalidSpeaker(speaker.get()));
        }
        Ok(SynthesisParameters::new(serde_json::json!({ "text": text })))
    }

    async fn render(
        &self,
        params: SynthesisParameters,
        speaker: SpeakerId,
    ) -> Result<Vec<u8>, TtsError> {
        self.simulate_latency().await;

        let query = params.into_inner();
        let text = query["text"].as_str().unwrap_or_default().to_string();

        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SynthesisCall {
                text: text.clone(),
                speaker,
            });

        if self.config.fail_texts.contains(&text) {
            return Err(TtsError::SynthesisFailed(format!("refused: {}", text)));
        }

        tracing::debug!(text_len = text.len(), speaker = %speaker, "FakeTtsClient: returning payload audio");
        Ok(encode_pcm16_wav(text.as_bytes(), self.config.sample_rate))
    }
}
