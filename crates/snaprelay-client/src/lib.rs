//! Upload client for the remote storage endpoint.
//!
//! One long-lived HTTP client per process (connection reuse), Basic-style
//! auth with a static secret, and a two-part multipart body: a `fileName`
//! text field plus the binary `file` part. Every call resolves into
//! exactly one [`UploadOutcome`]; transport and application failures never
//! escape as errors.

pub mod retry;

use anyhow::{Context, Result};
use base64::Engine as _;
use reqwest::Client;
use std::time::Duration;

use retry::{retry_on_connect, TransportError};
use snaprelay_core::models::{FailureKind, UploadJob, UploadOutcome};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(240);
const DEFAULT_CONNECT_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Upload client configuration. The endpoint and credential are fixed at
/// construction; they are not negotiated per request.
#[derive(Clone, Debug)]
pub struct UploadClientConfig {
    pub endpoint: String,
    pub secret: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Overall request deadline; must accommodate large body writes plus
    /// the read timeout.
    pub request_timeout: Duration,
    pub connect_retries: u32,
    pub retry_delay: Duration,
}

impl UploadClientConfig {
    pub fn new(endpoint: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            secret: secret.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_retries: DEFAULT_CONNECT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// HTTP client delivering upload jobs to the remote storage endpoint.
pub struct UploadClient {
    client: Client,
    config: UploadClientConfig,
}

impl UploadClient {
    pub fn new(config: UploadClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// `Authorization: Basic base64("{secret}:")` — the secret is the
    /// username, the password is empty.
    fn credential(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:", self.config.secret));
        format!("Basic {}", encoded)
    }

    async fn try_send(&self, job: &UploadJob, data: &[u8]) -> Result<reqwest::Response, TransportError> {
        let part = reqwest::multipart::Part::bytes(data.to_vec())
            .file_name(job.file_name.clone())
            .mime_str(&job.content_type)
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("fileName", job.file_name.clone())
            .part("file", part);

        self.client
            .post(&self.config.endpoint)
            .header("Authorization", self.credential())
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::from)
    }

    /// Deliver one upload job. Consumes the job; yields exactly one
    /// terminal outcome on every path.
    pub async fn upload(&self, job: UploadJob) -> UploadOutcome {
        let data = match tokio::fs::read(&job.file_path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(
                    path = %job.file_path.display(),
                    error = %e,
                    "Failed to read upload artifact"
                );
                return UploadOutcome::failure(
                    FailureKind::Network,
                    format!(
                        "failed to read upload artifact {}: {}",
                        job.file_path.display(),
                        e
                    ),
                );
            }
        };

        let start = std::time::Instant::now();

        let sent = retry_on_connect(
            self.config.connect_retries,
            self.config.retry_delay,
            || self.try_send(&job, &data),
        )
        .await;

        match sent {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    match response.text().await {
                        Ok(body) => {
                            tracing::info!(
                                file_name = %job.file_name,
                                status = status.as_u16(),
                                size_bytes = data.len(),
                                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                                "Upload successful"
                            );
                            UploadOutcome::Success { body }
                        }
                        Err(e) => {
                            tracing::error!(
                                file_name = %job.file_name,
                                error = %e,
                                "Failed to read upload response body"
                            );
                            UploadOutcome::failure(FailureKind::Network, e.to_string())
                        }
                    }
                } else {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    tracing::error!(
                        file_name = %job.file_name,
                        status = status.as_u16(),
                        body = %body,
                        "Upload rejected by endpoint"
                    );
                    UploadOutcome::failure(
                        FailureKind::Http {
                            status: status.as_u16(),
                        },
                        body,
                    )
                }
            }
            Err(err) => {
                tracing::error!(
                    file_name = %job.file_name,
                    error = %err,
                    "Upload transport failure"
                );
                UploadOutcome::failure(FailureKind::Network, err.to_string())
            }
        }
    }
}
