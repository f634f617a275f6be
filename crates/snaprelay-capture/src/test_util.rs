//! Capture doubles for tests in downstream crates.

use async_trait::async_trait;
use std::path::Path;

use crate::{CaptureError, CaptureResult, CaptureSource};
use snaprelay_core::models::RawImage;

/// Source whose device is permanently unavailable.
pub struct FailingCaptureSource {
    reason: String,
}

impl FailingCaptureSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CaptureSource for FailingCaptureSource {
    async fn capture(&self, _output_path: &Path) -> CaptureResult<RawImage> {
        Err(CaptureError::DeviceUnavailable(self.reason.clone()))
    }
}
