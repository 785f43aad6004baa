//! Upload: multipart POST to the format's endpoint, with bounded retry.
//!
//! ## Retry Strategy
//!
//! The backend fronts an AI upstream that sheds load with 5xx responses
//! under pressure; those are worth retrying. The wait grows linearly
//! (`retry_delay_ms × n` before retry *n*): with the 1 s default and 3
//! retries the sequence is 1 s → 2 s → 3 s, bounding total back-off at 6 s.
//!
//! Classification is a standalone function returning a tagged variant so the
//! policy is testable apart from the transport: 5xx is [`RetryClass::Retryable`],
//! everything else is [`RetryClass::Terminal`]. A request that never produces
//! an HTTP response (refused connection, DNS failure) is also terminal and
//! does not consume the retry budget.

use crate::config::ClientConfig;
use crate::error::VoxifyError;
use crate::format::OutputFormat;
use crate::payload::ProcessedResult;
use crate::pipeline::validate::AudioSource;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Error body fallback when the server sends no parsable `{detail}`.
const GENERIC_FAILURE: &str = "Processing failed";

/// How an HTTP status should be handled by the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Server-error range; retry while budget remains.
    Retryable,
    /// Everything else; surface immediately.
    Terminal,
}

/// Classify a non-success status for the retry loop.
pub fn classify_status(status: StatusCode) -> RetryClass {
    if status.is_server_error() {
        RetryClass::Retryable
    } else {
        RetryClass::Terminal
    }
}

/// Receipt for a completed upload: the decoded result plus how much work
/// it took to get there.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub result: ProcessedResult,
    /// Requests actually sent, including the successful one.
    pub attempts: u32,
    pub duration_ms: u64,
}

/// HTTP client for memo uploads. Cheap to clone; uploads share nothing but
/// the connection pool and the config's retry budget constants.
#[derive(Debug, Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl UploadClient {
    /// Build a client from the config. The optional request timeout applies
    /// to uploads only; health probes set their own per-request deadline.
    pub fn new(config: &ClientConfig) -> Result<Self, VoxifyError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| VoxifyError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Wrap an existing `reqwest::Client` (shared pool) with upload policy.
    pub fn with_http(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            config: config.clone(),
        }
    }

    /// Upload `source` to the endpoint for `format` and decode the response.
    ///
    /// Suspends until a terminal success or failure, inclusive of all
    /// retries. The format is fixed for the lifetime of the call; callers
    /// that let the user switch formats mid-flight get the format that was
    /// active at submission.
    pub async fn upload(
        &self,
        source: &AudioSource,
        format: OutputFormat,
    ) -> Result<UploadOutcome, VoxifyError> {
        let start = Instant::now();
        let url = format!("{}{}", self.config.base_url, format.endpoint());

        let bytes = tokio::fs::read(&source.path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => VoxifyError::FileNotFound {
                path: source.path.clone(),
            },
            std::io::ErrorKind::PermissionDenied => VoxifyError::PermissionDenied {
                path: source.path.clone(),
            },
            _ => VoxifyError::Internal(format!("read {}: {e}", source.path.display())),
        })?;

        info!(
            "uploading '{}' ({} bytes) as {format} to {url}",
            source.file_name,
            bytes.len()
        );

        let mut last_status: u16 = 0;
        let mut last_detail = GENERIC_FAILURE.to_string();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = self.config.retry_delay_ms * attempt as u64;
                warn!(
                    "'{}': retry {}/{} after {}ms",
                    source.file_name, attempt, self.config.max_retries, backoff
                );
                sleep(Duration::from_millis(backoff)).await;
            }

            // reqwest forms are consumed on send; rebuild per attempt.
            let part = Part::bytes(bytes.clone())
                .file_name(source.file_name.clone())
                .mime_str(&source.mime)
                .map_err(|e| VoxifyError::Internal(format!("mime '{}': {e}", source.mime)))?;
            let form = Form::new().part("file", part);

            let response = match self.http.post(&url).multipart(form).send().await {
                Ok(r) => r,
                Err(e) => {
                    return Err(VoxifyError::Connection {
                        reason: e.to_string(),
                    });
                }
            };

            let status = response.status();
            if status.is_success() {
                let value: serde_json::Value =
                    response
                        .json()
                        .await
                        .map_err(|e| VoxifyError::MalformedResult {
                            format,
                            detail: format!("body is not JSON: {e}"),
                        })?;
                let result = ProcessedResult::from_json(format, value)?;
                let duration_ms = start.elapsed().as_millis() as u64;
                debug!(
                    "'{}': processed as {format} in {duration_ms}ms ({} attempts)",
                    source.file_name,
                    attempt + 1
                );
                return Ok(UploadOutcome {
                    result,
                    attempts: attempt + 1,
                    duration_ms,
                });
            }

            let detail = error_detail(response).await;
            warn!(
                "'{}': attempt {} got HTTP {status}: {detail}",
                source.file_name,
                attempt + 1
            );

            match classify_status(status) {
                RetryClass::Terminal => {
                    return Err(VoxifyError::Client {
                        status: status.as_u16(),
                        detail,
                    });
                }
                RetryClass::Retryable => {
                    last_status = status.as_u16();
                    last_detail = detail;
                }
            }
        }

        // Budget exhausted; surface the last server-supplied message.
        Err(VoxifyError::Server {
            status: last_status,
            attempts: self.config.max_retries + 1,
            detail: last_detail,
        })
    }
}

/// Extract the server's `{detail}` message from an error response,
/// falling back to a generic message when the body is absent or unparsable.
async fn error_detail(response: reqwest::Response) -> String {
    let body = match response.bytes().await {
        Ok(b) => b,
        Err(_) => return GENERIC_FAILURE.to_string(),
    };
    serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}
