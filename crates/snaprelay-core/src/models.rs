//! Domain models shared across the pipeline crates.
//!
//! A pipeline run owns one `CaptureRequest`, at most one `RawImage`, at most
//! one `TranscodedImage`, at most one `UploadJob`, and exactly one
//! `UploadOutcome`. None of these types outlive the run that produced them.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

/// Encoded format of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    Jpeg,
    Png,
}

impl FrameFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            FrameFormat::Jpeg => "image/jpeg",
            FrameFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FrameFormat::Jpeg => "jpg",
            FrameFormat::Png => "png",
        }
    }
}

/// Opaque trigger for one pipeline run. Carries no payload beyond the run id
/// used for log correlation and the instant the trigger fired, which seeds
/// the artifact file name.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub run_id: Uuid,
    pub requested_at: DateTime<Utc>,
}

impl CaptureRequest {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            requested_at: Utc::now(),
        }
    }
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// A captured still frame. Immutable once produced; `path` points at the
/// durable spool artifact the capture source wrote as a side channel.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub bytes: Bytes,
    pub format: FrameFormat,
    pub captured_at: DateTime<Utc>,
    pub path: PathBuf,
}

/// A re-encoded frame derived from exactly one [`RawImage`].
#[derive(Debug, Clone)]
pub struct TranscodedImage {
    pub bytes: Bytes,
    pub quality: u8,
    pub path: PathBuf,
}

/// One upload unit, consumed exactly once by the upload client. The
/// destination endpoint and credential live in the client configuration,
/// not on the job.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub file_path: PathBuf,
    pub file_name: String,
    pub content_type: String,
}

/// Classification of a terminal failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// Device or frame persistence failure. Terminal, never retried.
    Capture,
    /// Transport-level failure, including exhausted connect retries.
    Network,
    /// Application-level rejection by the remote endpoint. Never retried.
    Http { status: u16 },
}

/// The single terminal result of a pipeline run.
///
/// `Success` carries the provider response body verbatim; callers treat it
/// as opaque text or JSON. `Failure` carries the classification plus a
/// diagnostic message (for HTTP rejections, the response body text).
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success { body: String },
    Failure { kind: FailureKind, message: String },
}

impl UploadOutcome {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        UploadOutcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }
}
