//! Audio Artifact - 播放用临时音频文件

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 合成结果的临时文件
///
/// 持有期间文件存在，drop 或 `close` 时删除
#[derive(Debug)]
pub struct AudioArtifact {
    file: NamedTempFile,
    len: usize,
}

impl AudioArtifact {
    /// 在 `dir` 下写入音频数据
    pub fn create(dir: &Path, bytes: &[u8]) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;

        let mut file = tempfile::Builder::new()
            .prefix("yomiage-")
            .suffix(".wav")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self {
            file,
            len: bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// 删除文件并返回删除错误（drop 时会静默忽略）
    pub fn close(self) -> std::io::Result<()> {
        self.file.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_lifecycle() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("audio");

        let artifact = AudioArtifact::create(&nested, b"RIFF....").unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(artifact.len(), 8);
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....");

        artifact.close().unwrap();
        assert!(!path.exists());

        let dropped = AudioArtifact::create(&nested, b"x").unwrap();
        let path = dropped.path().to_path_buf();
        drop(dropped);
        assert!(!path.exists());
    }
}
