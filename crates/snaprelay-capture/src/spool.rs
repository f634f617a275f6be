//! Durable frame spool.
//!
//! The spool is the caller-writable directory holding raw and transcoded
//! frame artifacts for the duration of a run. Writes are fsync'd before
//! returning so the upload stage always sees a complete file; deletion is
//! left to external cleanup.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::{CaptureError, CaptureResult};

/// Handle to the spool directory.
#[derive(Clone, Debug)]
pub struct Spool {
    dir: PathBuf,
}

impl Spool {
    /// Open the spool, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> CaptureResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Spool { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a file name to a path inside the spool.
    ///
    /// File names must be bare names; separators and `..` are rejected so a
    /// hostile name cannot escape the spool directory.
    pub fn frame_path(&self, file_name: &str) -> CaptureResult<PathBuf> {
        if file_name.is_empty()
            || file_name.contains("..")
            || file_name.contains('/')
            || file_name.contains('\\')
        {
            return Err(CaptureError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.dir.join(file_name))
    }
}

/// Write one frame artifact to `path`, fsync'd.
pub async fn write_frame(path: &Path, data: &[u8]) -> CaptureResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let start = std::time::Instant::now();

    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;

    tracing::debug!(
        path = %path.display(),
        size_bytes = data.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Spool write complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("frames");
        let spool = Spool::open(&nested).await.unwrap();

        assert!(nested.is_dir());
        assert_eq!(spool.dir(), nested);
    }

    #[tokio::test]
    async fn test_write_frame_roundtrip() {
        let dir = tempdir().unwrap();
        let spool = Spool::open(dir.path()).await.unwrap();
        let path = spool.frame_path("20260806_141523.jpg").unwrap();

        write_frame(&path, b"jpeg bytes").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_frame_path_rejects_traversal() {
        let dir = tempdir().unwrap();
        let spool = Spool::open(dir.path()).await.unwrap();

        assert!(matches!(
            spool.frame_path("../escape.jpg"),
            Err(CaptureError::InvalidFileName(_))
        ));
        assert!(matches!(
            spool.frame_path("nested/frame.jpg"),
            Err(CaptureError::InvalidFileName(_))
        ));
        assert!(matches!(
            spool.frame_path(""),
            Err(CaptureError::InvalidFileName(_))
        ));
    }
}
