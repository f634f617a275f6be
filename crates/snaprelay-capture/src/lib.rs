//! Capture source abstraction
//!
//! A [`CaptureSource`] produces a still frame on demand and writes it to a
//! caller-specified durable spool location as a side channel, because the
//! downstream transcode and upload stages operate on the stored artifact.
//! Device binding and lifecycle belong to the external provider that hands
//! the source to the pipeline; this crate only defines the seam and a
//! buffered reference adapter.

pub mod spool;
pub mod test_util;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::path::Path;
use thiserror::Error;

use snaprelay_core::models::{FrameFormat, RawImage};

/// Capture operation errors
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("no active device binding: {0}")]
    NotBound(String),

    #[error("invalid frame file name: {0}")]
    InvalidFileName(String),

    #[error("failed to persist captured frame: {0}")]
    Persist(#[from] std::io::Error),
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Abstraction over a device that can produce a still image on demand.
///
/// `capture` must write the encoded frame to `output_path` before
/// returning and hand back the same bytes in the [`RawImage`]. Completion
/// is async; there is no cancellation — the device either completes or
/// raises a [`CaptureError`].
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn capture(&self, output_path: &Path) -> CaptureResult<RawImage>;
}

/// Reference adapter holding one pre-acquired encoded frame.
///
/// Stands in for a bound device in tests and in integrations where frame
/// acquisition happens upstream (the provider hands over finished bytes).
pub struct BufferedCaptureSource {
    frame: Bytes,
    format: FrameFormat,
}

impl BufferedCaptureSource {
    pub fn new(frame: impl Into<Bytes>, format: FrameFormat) -> Self {
        Self {
            frame: frame.into(),
            format,
        }
    }
}

#[async_trait]
impl CaptureSource for BufferedCaptureSource {
    async fn capture(&self, output_path: &Path) -> CaptureResult<RawImage> {
        spool::write_frame(output_path, &self.frame).await?;

        Ok(RawImage {
            bytes: self.frame.clone(),
            format: self.format,
            captured_at: Utc::now(),
            path: output_path.to_path_buf(),
        })
    }
}
