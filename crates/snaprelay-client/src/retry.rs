//! Transport error classification and connect-retry policy.
//!
//! Only pure connection-establishment failures are retried; timeouts and
//! anything that reached the application layer are surfaced immediately.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Run `op`, retrying connection-establishment failures up to `retries`
/// additional attempts with a fixed delay between them.
pub async fn retry_on_connect<T, F, Fut>(
    retries: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(TransportError::Connect(message)) if attempt <= retries => {
                tracing::warn!(
                    attempt = attempt,
                    max_attempts = retries + 1,
                    error = %message,
                    "Connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
