//! Configuration module
//!
//! Pipeline configuration is read from the environment (with `.env`
//! support). The upload endpoint and credential are required; everything
//! else falls back to the defaults below.

use std::env;
use std::path::PathBuf;

const DEFAULT_JPEG_QUALITY: u8 = 70;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 120;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 240;
const DEFAULT_CONNECT_RETRIES: u32 = 2;
const DEFAULT_SPOOL_DIR: &str = "spool";

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Remote storage endpoint receiving the multipart POST.
    pub upload_endpoint: String,
    /// Static secret sent as the Basic-auth username (empty password).
    pub upload_api_key: String,
    /// Caller-writable directory for raw and transcoded frame artifacts.
    pub spool_dir: PathBuf,
    /// JPEG re-encode quality, 0-100.
    pub jpeg_quality: u8,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Retry budget for pure connection-establishment failures.
    pub connect_retries: u32,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config = PipelineConfig {
            upload_endpoint: env::var("UPLOAD_ENDPOINT")
                .map_err(|_| anyhow::anyhow!("UPLOAD_ENDPOINT must be set"))?,
            upload_api_key: env::var("UPLOAD_API_KEY")
                .map_err(|_| anyhow::anyhow!("UPLOAD_API_KEY must be set"))?,
            spool_dir: env::var("SPOOL_DIR")
                .unwrap_or_else(|_| DEFAULT_SPOOL_DIR.to_string())
                .into(),
            jpeg_quality: env::var("JPEG_QUALITY")
                .unwrap_or_else(|_| DEFAULT_JPEG_QUALITY.to_string())
                .parse()
                .unwrap_or(DEFAULT_JPEG_QUALITY),
            connect_timeout_secs: env::var("UPLOAD_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_CONNECT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout_secs: env::var("UPLOAD_READ_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_READ_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
            request_timeout_secs: env::var("UPLOAD_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_retries: env::var("UPLOAD_CONNECT_RETRIES")
                .unwrap_or_else(|_| DEFAULT_CONNECT_RETRIES.to_string())
                .parse()
                .unwrap_or(DEFAULT_CONNECT_RETRIES),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.upload_endpoint.starts_with("http://")
            && !self.upload_endpoint.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "UPLOAD_ENDPOINT must be an http(s) URL, got {:?}",
                self.upload_endpoint
            ));
        }

        if self.upload_api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_API_KEY must not be empty"));
        }

        if self.jpeg_quality > 100 {
            return Err(anyhow::anyhow!(
                "JPEG_QUALITY must be 0-100, got {}",
                self.jpeg_quality
            ));
        }

        if self.request_timeout_secs < self.connect_timeout_secs {
            return Err(anyhow::anyhow!(
                "UPLOAD_REQUEST_TIMEOUT_SECS ({}) must not be shorter than UPLOAD_CONNECT_TIMEOUT_SECS ({})",
                self.request_timeout_secs,
                self.connect_timeout_secs
            ));
        }

        Ok(())
    }
}
