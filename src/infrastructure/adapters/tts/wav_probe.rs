//! WAV 校验
//!
//! 合成结果在交给播放之前先用 symphonia 探测一次，空数据或非 WAV 直接判为合成失败

use std::io::Cursor;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::TtsError;

/// WAV 基本信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u8,
    /// 时长（毫秒），头中没有帧数时为 None
    pub duration_ms: Option<u64>,
}

/// 探测 WAV 数据
pub fn probe_wav(data: &[u8]) -> Result<WavInfo, TtsError> {
    if data.is_empty() {
        return Err(TtsError::SynthesisFailed("empty waveform".to_string()));
    }

    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| TtsError::SynthesisFailed(format!("Probe failed: {}", e)))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| TtsError::SynthesisFailed("No audio track found".to_string()))?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| TtsError::SynthesisFailed("Unknown sample rate".to_string()))?;

    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u8)
        .unwrap_or(1);

    let duration_ms = track
        .codec_params
        .n_frames
        .filter(|_| sample_rate > 0)
        .map(|frames| frames * 1000 / sample_rate as u64);

    Ok(WavInfo {
        sample_rate,
        channels,
        duration_ms,
    })
}

/// 构造 16bit PCM 单声道 WAV，`payload` 原样作为采样数据（奇数长度补零）
///
/// 供测试桩使用
pub fn encode_pcm16_wav(payload: &[u8], sample_rate: u32) -> Vec<u8> {
    let mut data = payload.to_vec();
    if data.len() % 2 != 0 {
        data.push(0);
    }
    if data.is_empty() {
        data.extend_from_slice(&[0, 0]);
    }

    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let data_size = data.len() as u32;

    let mut wav = Vec::with_capacity(44 + data.len());

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    let block_align = num_channels * (bits_per_sample / 8);
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend_from_slice(&data);

    wav
}

/// 取回 `encode_pcm16_wav` 写入的 payload（去掉末尾补零）
pub fn decode_pcm16_payload(wav: &[u8]) -> Option<Vec<u8>> {
    if wav.len() < 44 || &wav[0..4] != b"RIFF" || &wav[36..40] != b"data" {
        return None;
    }
    let mut payload = wav[44..].to_vec();
    while payload.last() == Some(&0) {
        payload.pop();
    }
    Some(payload)
}
