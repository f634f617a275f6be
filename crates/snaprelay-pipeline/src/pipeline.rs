//! Pipeline run: capture → transcode → upload → report.
//!
//! Stage errors are caught at stage boundaries: capture errors are
//! terminal, transcode errors fall back to the raw frame, upload errors
//! are already terminal outcomes. Nothing escapes the run as a panic or
//! unhandled fault.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

use snaprelay_capture::spool::{self, Spool};
use snaprelay_capture::CaptureSource;
use snaprelay_client::{UploadClient, UploadClientConfig};
use snaprelay_core::models::{
    CaptureRequest, FailureKind, RawImage, TranscodedImage, UploadJob, UploadOutcome,
};
use snaprelay_core::{naming, PipelineConfig};
use snaprelay_processing::{ImageTranscoder, JpegTranscoder};

/// Active stage of a run, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Capturing,
    Transcoding,
    Uploading,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Capturing => write!(f, "capturing"),
            Stage::Transcoding => write!(f, "transcoding"),
            Stage::Uploading => write!(f, "uploading"),
        }
    }
}

/// Presentation boundary: receives the terminal outcome of a spawned run.
///
/// The pipeline calls `deliver` on whatever execution context it finished
/// on; marshaling to a UI or other consumer context is the sink owner's
/// responsibility.
pub trait OutcomeSink: Send + Sync {
    fn deliver(&self, outcome: UploadOutcome);
}

/// One pipeline run. Constructed per trigger and consumed by
/// [`run`](CapturePipeline::run); a new trigger builds a fresh instance.
pub struct CapturePipeline {
    source: Arc<dyn CaptureSource>,
    transcoder: Arc<dyn ImageTranscoder>,
    client: Arc<UploadClient>,
    spool: Spool,
    jpeg_quality: u8,
}

impl CapturePipeline {
    pub fn new(
        source: Arc<dyn CaptureSource>,
        transcoder: Arc<dyn ImageTranscoder>,
        client: Arc<UploadClient>,
        spool: Spool,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            source,
            transcoder,
            client,
            spool,
            jpeg_quality,
        }
    }

    /// Assemble a run from configuration: opens the spool and builds the
    /// upload client with the configured transport policy.
    pub async fn from_config(
        config: &PipelineConfig,
        source: Arc<dyn CaptureSource>,
    ) -> Result<Self> {
        let spool = Spool::open(&config.spool_dir)
            .await
            .context("Failed to open spool directory")?;

        let mut client_config =
            UploadClientConfig::new(config.upload_endpoint.clone(), config.upload_api_key.clone());
        client_config.connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        client_config.read_timeout = Duration::from_secs(config.read_timeout_secs);
        client_config.request_timeout = Duration::from_secs(config.request_timeout_secs);
        client_config.connect_retries = config.connect_retries;

        let client = Arc::new(UploadClient::new(client_config)?);

        Ok(Self::new(
            source,
            Arc::new(JpegTranscoder),
            client,
            spool,
            config.jpeg_quality,
        ))
    }

    /// Execute the run to its terminal outcome. Consumes the pipeline;
    /// every path yields exactly one outcome.
    pub async fn run(self) -> UploadOutcome {
        let request = CaptureRequest::new();
        let span = tracing::info_span!("pipeline_run", run_id = %request.run_id);
        self.execute(request).instrument(span).await
    }

    /// Fire-and-forget variant: runs on a spawned task and delivers the
    /// outcome to `sink` exactly once.
    pub fn spawn(self, sink: Arc<dyn OutcomeSink>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let outcome = self.run().await;
            sink.deliver(outcome);
        })
    }

    async fn execute(self, request: CaptureRequest) -> UploadOutcome {
        let file_name = naming::frame_file_name(request.requested_at, "jpg");

        let raw_path = match self.spool.frame_path(&file_name) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(stage = %Stage::Capturing, error = %e, "Invalid spool path");
                return UploadOutcome::failure(FailureKind::Capture, e.to_string());
            }
        };

        tracing::info!(
            stage = %Stage::Capturing,
            path = %raw_path.display(),
            "Requesting frame from capture source"
        );

        let raw = match self.source.capture(&raw_path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(stage = %Stage::Capturing, error = %e, "Capture failed");
                return UploadOutcome::failure(FailureKind::Capture, e.to_string());
            }
        };

        let transcoded_name = naming::transcoded_file_name(&file_name);
        let transcoded = self.transcode_stage(&raw, &transcoded_name).await;

        let job = match &transcoded {
            Some(t) => UploadJob {
                file_path: t.path.clone(),
                file_name: transcoded_name,
                content_type: "image/jpeg".to_string(),
            },
            None => UploadJob {
                file_path: raw.path.clone(),
                file_name,
                content_type: raw.format.mime_type().to_string(),
            },
        };

        tracing::info!(
            stage = %Stage::Uploading,
            file_name = %job.file_name,
            transcoded = transcoded.is_some(),
            "Uploading frame"
        );

        let outcome = self.client.upload(job).await;

        match &outcome {
            UploadOutcome::Success { .. } => {
                tracing::info!(run_id = %request.run_id, "Pipeline run complete")
            }
            UploadOutcome::Failure { kind, message } => {
                tracing::error!(run_id = %request.run_id, kind = ?kind, message = %message, "Pipeline run failed")
            }
        }

        outcome
    }

    /// Advisory transcode stage: any failure here (encode, task join, or
    /// artifact persistence) falls back to the raw frame.
    async fn transcode_stage(&self, raw: &RawImage, transcoded_name: &str) -> Option<TranscodedImage> {
        let transcoder = self.transcoder.clone();
        let data = raw.bytes.clone();
        let quality = self.jpeg_quality;

        let encoded = match tokio::task::spawn_blocking(move || transcoder.transcode(&data, quality)).await
        {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                tracing::warn!(stage = %Stage::Transcoding, error = %e, "Transcode failed, uploading raw frame");
                return None;
            }
            Err(e) => {
                tracing::warn!(stage = %Stage::Transcoding, error = %e, "Transcode task failed, uploading raw frame");
                return None;
            }
        };

        let path = match self.spool.frame_path(transcoded_name) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(stage = %Stage::Transcoding, error = %e, "Invalid transcoded artifact name, uploading raw frame");
                return None;
            }
        };

        if let Err(e) = spool::write_frame(&path, &encoded).await {
            tracing::warn!(stage = %Stage::Transcoding, error = %e, "Failed to persist transcoded frame, uploading raw frame");
            return None;
        }

        tracing::info!(
            stage = %Stage::Transcoding,
            raw_bytes = raw.bytes.len(),
            transcoded_bytes = encoded.len(),
            quality = quality,
            "Frame transcoded"
        );

        Some(TranscodedImage {
            bytes: encoded,
            quality,
            path,
        })
    }
}
