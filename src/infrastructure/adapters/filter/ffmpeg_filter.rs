//! FFmpeg Filter - 通过外部 ffmpeg 进程做变速、音量与解码
//!
//! ffmpeg -i <source> -filter:a atempo=<speed>,volume=<volume> -f f32le -ar 48000 -ac 2 pipe:1

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{
    AudioFilterPort, FilterError, PlaybackFilter, PCM_CHANNELS, PCM_SAMPLE_RATE,
};

/// FFmpeg 音频变换
pub struct FfmpegFilter {
    executable: PathBuf,
}

impl FfmpegFilter {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// 命令行参数（不含可执行文件本身）
    fn build_args(source: &Path, filter: &PlaybackFilter) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            source.to_string_lossy().into_owned(),
            "-filter:a".to_string(),
            filter.to_filter_graph(),
            "-f".to_string(),
            "f32le".to_string(),
            "-ar".to_string(),
            PCM_SAMPLE_RATE.to_string(),
            "-ac".to_string(),
            PCM_CHANNELS.to_string(),
            "pipe:1".to_string(),
        ]
    }
}

#[async_trait]
impl AudioFilterPort for FfmpegFilter {
    async fn apply(&self, source: &Path, filter: &PlaybackFilter) -> Result<Vec<u8>, FilterError> {
        let args = Self::build_args(source, filter);

        tracing::debug!(
            executable = %self.executable.display(),
            source = %source.display(),
            filter = %filter.to_filter_graph(),
            "Running audio filter"
        );

        let output = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| FilterError::SpawnError(format!("{}: {}", self.executable.display(), e)))?;

        if !output.status.success() {
            return Err(FilterError::ProcessError {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if output.stdout.is_empty() {
            return Err(FilterError::EmptyOutput);
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let filter = PlaybackFilter::new(2.0, 0.7);
        let args = FfmpegFilter::build_args(Path::new("/tmp/a.wav"), &filter);

        let joined = args.join(" ");
        assert!(joined.contains("-i /tmp/a.wav"));
        assert!(joined.contains("-filter:a atempo=2,volume=0.7"));
        assert!(joined.ends_with("-f f32le -ar 48000 -ac 2 pipe:1"));
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let filter = FfmpegFilter::new("/nonexistent/ffmpeg-binary");
        let result = filter
            .apply(Path::new("/tmp/a.wav"), &PlaybackFilter::default())
            .await;
        assert!(matches!(result, Err(FilterError::SpawnError(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_process() {
        // `false` 总是以非零状态退出
        let filter = FfmpegFilter::new("false");
        let result = filter
            .apply(Path::new("/tmp/a.wav"), &PlaybackFilter::default())
            .await;
        assert!(matches!(result, Err(FilterError::ProcessError { .. })));
    }
}
