//! TTS Engine Port - 合成引擎抽象
//!
//! 定义 VOICEVOX 兼容引擎的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{SpeakerEntry, SpeakerId};

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    /// 无法连接、超时或传输中断
    #[error("TTS engine unavailable: {0}")]
    EngineUnavailable(String),

    /// 引擎拒绝了话者 ID
    #[error("Invalid speaker: {0}")]
    InvalidSpeaker(u32),

    /// 合成结果为空或无法解析
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成参数（VOICEVOX 的 AudioQuery）
///
/// 对调用方不透明；只能被 `render` 消费一次
#[derive(Debug)]
pub struct SynthesisParameters(serde_json::Value);

impl SynthesisParameters {
    pub fn new(query: serde_json::Value) -> Self {
        Self(query)
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

/// 引擎返回的话者（一名角色可有多个声线）
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSpeaker {
    pub name: String,
    #[serde(default)]
    pub speaker_uuid: Option<String>,
    #[serde(default)]
    pub styles: Vec<EngineStyle>,
}

/// 声线
#[derive(Debug, Clone, Deserialize)]
pub struct EngineStyle {
    pub id: u32,
    pub name: String,
}

/// 把引擎的话者展开为 (显示名, 声线名, ID)，保持引擎顺序
pub fn flatten_speakers(speakers: &[EngineSpeaker]) -> Vec<SpeakerEntry> {
    speakers
        .iter()
        .flat_map(|speaker| {
            speaker.styles.iter().map(move |style| {
                SpeakerEntry::new(speaker.name.clone(), style.name.clone(), SpeakerId::new(style.id))
            })
        })
        .collect()
}

/// TTS Engine Port
///
/// 每次调用都是一次到同一 base URL 的往返，失败不重试
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 引擎版本（健康检查）
    async fn version(&self) -> Result<String, TtsError>;

    /// 获取所有话者
    async fn speakers(&self) -> Result<Vec<EngineSpeaker>, TtsError>;

    /// 根据文本和话者生成合成参数
    async fn build_parameters(
        &self,
        text: &str,
        speaker: SpeakerId,
    ) -> Result<SynthesisParameters, TtsError>;

    /// 把合成参数渲染为 WAV 字节
    async fn render(
        &self,
        params: SynthesisParameters,
        speaker: SpeakerId,
    ) -> Result<Vec<u8>, TtsError>;

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        self.version().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_speakers_keeps_order() {
        let json = r#"[
            {"name": "四国めたん", "speaker_uuid": "7ffcb7ce", "styles": [
                {"id": 2, "name": "ノーマル"}, {"id": 0, "name": "あまあま"}
            ]},
            {"name": "ずんだもん", "styles": [{"id": 3, "name": "ノーマル"}]}
        ]"#;
        let speakers: Vec<EngineSpeaker> = serde_json::from_str(json).unwrap();
        let entries = flatten_speakers(&speakers);

        let ids: Vec<u32> = entries.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![2, 0, 3]);
        assert_eq!(entries[1].display_name, "四国めたん");
        assert_eq!(entries[1].style_name, "あまあま");
    }
}
