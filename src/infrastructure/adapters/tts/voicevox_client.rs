//! VOICEVOX Client - 调用 VOICEVOX 兼容的 HTTP 引擎
//!
//! 实现 TtsEnginePort trait
//!
//! 引擎 API:
//! GET  /version                                 -> "0.14.5" (JSON string)
//! GET  /speakers                                -> [{name, speaker_uuid, styles: [{id, name}]}]
//! POST /audio_query?text=...&speaker=1          -> AudioQuery (JSON)
//! POST /synthesis?speaker=1   body: AudioQuery  -> audio/wav binary

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::wav_probe::probe_wav;
use crate::application::ports::{
    EngineSpeaker, SynthesisParameters, TtsEnginePort, TtsError,
};
use crate::domain::SpeakerId;

/// VOICEVOX 客户端配置
#[derive(Debug, Clone)]
pub struct VoicevoxClientConfig {
    /// 引擎基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for VoicevoxClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:50021".to_string(),
            timeout_secs: 30,
        }
    }
}

impl VoicevoxClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// VOICEVOX 客户端
pub struct VoicevoxClient {
    client: Client,
    config: VoicevoxClientConfig,
}

impl VoicevoxClient {
    /// 创建新的客户端
    pub fn new(config: VoicevoxClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::EngineUnavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

/// 传输层错误统一视为引擎不可用
fn transport_error(e: reqwest::Error) -> TtsError {
    if e.is_timeout() {
        TtsError::EngineUnavailable(format!("Request timeout: {}", e))
    } else if e.is_connect() {
        TtsError::EngineUnavailable(format!("Cannot connect to TTS engine: {}", e))
    } else {
        TtsError::EngineUnavailable(e.to_string())
    }
}

/// 合成请求的非成功状态码
///
/// 404/422 表示引擎不认识该话者
async fn synthesis_status_error(response: reqwest::Response, speaker: SpeakerId) -> TtsError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND || status == StatusCode::UNPROCESSABLE_ENTITY {
        return TtsError::InvalidSpeaker(speaker.get());
    }
    let error_text = response.text().await.unwrap_or_default();
    TtsError::SynthesisFailed(format!("HTTP {}: {}", status, error_text))
}

#[async_trait]
impl TtsEnginePort for VoicevoxClient {
    async fn version(&self) -> Result<String, TtsError> {
        let response = self
            .client
            .get(self.url("/version"))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::EngineUnavailable(format!("HTTP {}", status)));
        }

        response
            .json::<String>()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to parse version: {}", e)))
    }

    async fn speakers(&self) -> Result<Vec<EngineSpeaker>, TtsError> {
        let response = self
            .client
            .get(self.url("/speakers"))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let speakers = response
            .json::<Vec<EngineSpeaker>>()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to parse speakers: {}", e)))?;

        tracing::debug!(count = speakers.len(), "Fetched speakers from engine");
        Ok(speakers)
    }

    async fn build_parameters(
        &self,
        text: &str,
        speaker: SpeakerId,
    ) -> Result<SynthesisParameters, TtsError> {
        tracing::debug!(
            url = %self.url("/audio_query"),
            text_len = text.chars().count(),
            speaker = %speaker,
            "Sending audio_query request"
        );

        let speaker_param = speaker.get().to_string();
        let response = self
            .client
            .post(self.url("/audio_query"))
            .query(&[("text", text), ("speaker", speaker_param.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(synthesis_status_error(response, speaker).await);
        }

        let query = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TtsError::SynthesisFailed(format!("Malformed audio query: {}", e)))?;

        if !query.is_object() {
            return Err(TtsError::SynthesisFailed(
                "Audio query is not a JSON object".to_string(),
            ));
        }

        Ok(SynthesisParameters::new(query))
    }

    async fn render(
        &self,
        params: SynthesisParameters,
        speaker: SpeakerId,
    ) -> Result<Vec<u8>, TtsError> {
        let response = self
            .client
            .post(self.url("/synthesis"))
            .query(&[("speaker", speaker.get())])
            .json(&params.into_inner())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(synthesis_status_error(response, speaker).await);
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::SynthesisFailed(format!("Failed to read audio: {}", e)))?
            .to_vec();

        let info = probe_wav(&audio_data)?;

        tracing::info!(
            speaker = %speaker,
            audio_size = audio_data.len(),
            sample_rate = info.sample_rate,
            duration_ms = ?info.duration_ms,
            "Synthesis completed"
        );

        Ok(audio_data)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.url("/version"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::tts::wav_probe::encode_pcm16_wav;
    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// 进程内的 VOICEVOX 桩服务，只认识话者 1
    async fn spawn_stub_engine() -> String {
        async fn audio_query(
            Query(params): Query<HashMap<String, String>>,
        ) -> Result<Json<Value>, AxumStatus> {
            if params.get("speaker").map(String::as_str) != Some("1") {
                return Err(AxumStatus::NOT_FOUND);
            }
            let text = params.get("text").cloned().unwrap_or_default();
            Ok(Json(json!({ "kana": text, "speedScale": 1.0, "accent_phrases": [] })))
        }

        async fn synthesis(
            Query(params): Query<HashMap<String, String>>,
            Json(query): Json<Value>,
        ) -> Result<Vec<u8>, AxumStatus> {
            if params.get("speaker").map(String::as_str) != Some("1") {
                return Err(AxumStatus::UNPROCESSABLE_ENTITY);
            }
            let kana = query["kana"].as_str().unwrap_or_default().to_string();
            if kana == "empty" {
                return Ok(Vec::new());
            }
            Ok(encode_pcm16_wav(kana.as_bytes(), 24_000))
        }

        let app = Router::new()
            .route("/version", get(|| async { Json("0.14.5") }))
            .route(
                "/speakers",
                get(|| async {
                    Json(json!([
                        {"name": "ずんだもん", "speaker_uuid": "388f246b", "styles": [
                            {"id": 3, "name": "ノーマル"}, {"id": 1, "name": "あまあま"}
                        ]}
                    ]))
                }),
            )
            .route("/audio_query", post(audio_query))
            .route("/synthesis", post(synthesis));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_config_default() {
        let config = VoicevoxClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:50021");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_builder() {
        let config = VoicevoxClientConfig::new("http://example.com:9000").with_timeout(60);
        assert_eq!(config.base_url, "http://example.com:9000");
        assert_eq!(config.timeout_secs, 60);
    }

    #[tokio::test]
    async fn test_version_and_speakers() {
        let base_url = spawn_stub_engine().await;
        let client = VoicevoxClient::new(VoicevoxClientConfig::new(base_url)).unwrap();

        assert_eq!(client.version().await.unwrap(), "0.14.5");
        assert!(client.health_check().await);

        let speakers = client.speakers().await.unwrap();
        assert_eq!(speakers.len(), 1);
        assert_eq!(speakers[0].styles[1].id, 1);
    }

    #[tokio::test]
    async fn test_build_and_render() {
        let base_url = spawn_stub_engine().await;
        let client = VoicevoxClient::new(VoicevoxClientConfig::new(base_url)).unwrap();

        let params = client
            .build_parameters("こんにちは", SpeakerId::new(1))
            .await
            .unwrap();
        let wav = client.render(params, SpeakerId::new(1)).await.unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        let info = probe_wav(&wav).unwrap();
        assert_eq!(info.sample_rate, 24_000);
    }

    #[tokio::test]
    async fn test_rejected_speaker() {
        let base_url = spawn_stub_engine().await;
        let client = VoicevoxClient::new(VoicevoxClientConfig::new(base_url)).unwrap();

        let result = client.build_parameters("テスト", SpeakerId::new(99)).await;
        assert!(matches!(result, Err(TtsError::InvalidSpeaker(99))));

        let params = SynthesisParameters::new(json!({ "kana": "テスト" }));
        let result = client.render(params, SpeakerId::new(5)).await;
        assert!(matches!(result, Err(TtsError::InvalidSpeaker(5))));
    }

    #[tokio::test]
    async fn test_empty_waveform_is_synthesis_failure() {
        let base_url = spawn_stub_engine().await;
        let client = VoicevoxClient::new(VoicevoxClientConfig::new(base_url)).unwrap();

        let params = SynthesisParameters::new(json!({ "kana": "empty" }));
        let result = client.render(params, SpeakerId::new(1)).await;
        assert!(matches!(result, Err(TtsError::SynthesisFailed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_engine() {
        // 端口 1 上没有服务
        let client = VoicevoxClient::new(
            VoicevoxClientConfig::new("http://127.0.0.1:1").with_timeout(2),
        )
        .unwrap();

        assert!(matches!(
            client.version().await,
            Err(TtsError::EngineUnavailable(_))
        ));
        assert!(!client.health_check().await);
        assert!(matches!(
            client.build_parameters("テスト", SpeakerId::new(1)).await,
            Err(TtsError::EngineUnavailable(_))
        ));
    }
}
