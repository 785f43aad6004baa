//! Configuration for the voxify client.
//!
//! Every knob lives in one [`ClientConfig`] struct built via its
//! [`ClientConfigBuilder`]. Keeping the whole surface in a single value makes
//! it trivial to share a config between concurrent uploads, log it, and diff
//! two runs to understand why their behaviour differed.
//!
//! # Design choice: builder over constructor
//! Callers usually care about one or two fields (the base URL, maybe the
//! retry budget). The builder lets them set exactly those and rely on
//! documented defaults for the rest.

use crate::error::VoxifyError;
use serde::{Deserialize, Serialize};

/// Upload size ceiling enforced before any network traffic: 25 MiB.
pub const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// Configuration for backend communication and upload policy.
///
/// Built via [`ClientConfig::builder()`] or [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use voxify::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://voxify-backend.onrender.com")
///     .max_retries(3)
///     .premium(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL. Default: `http://localhost:8000`.
    ///
    /// The upload endpoint per format is appended to this
    /// (see [`crate::format::OutputFormat::endpoint`]).
    pub base_url: String,

    /// Upload size ceiling in bytes. Default: 25 MiB.
    ///
    /// Matches the backend's own limit; rejecting locally spares the user a
    /// slow upload that was always going to 413.
    pub max_file_size: u64,

    /// Maximum retries after a server-error response. Default: 3.
    ///
    /// Only 5xx responses consume the budget. 4xx responses and transport
    /// failures are terminal on the first occurrence.
    pub max_retries: u32,

    /// Base retry delay in milliseconds (linear backoff). Default: 1000.
    ///
    /// The wait before retry *n* is `retry_delay_ms × n`: 1 s, then 2 s,
    /// then 3 s. Linear rather than exponential: the backend's transient
    /// failures are queue pressure from its AI upstream, which drains on the
    /// order of seconds, and three bounded waits keep the worst case under 7 s.
    pub retry_delay_ms: u64,

    /// Number of concurrent uploads when processing several memos. Default: 4.
    ///
    /// Uploads are network-bound; each is fully independent (no shared state
    /// beyond this config), so moderate parallelism is safe. The backend
    /// transcribes each file through the same AI upstream; more than a
    /// handful at once mostly converts parallelism into 5xx retries.
    pub concurrency: usize,

    /// Whether the caller holds the premium entitlement. Default: false.
    ///
    /// Formats other than `tasks` are premium-gated; validation fails before
    /// upload for non-premium callers.
    pub premium: bool,

    /// Seconds between background health probes. Default: 30.
    pub health_interval_secs: u64,

    /// Timeout for a single health probe in seconds. Default: 10.
    ///
    /// A hung probe must not wedge the monitor loop; an unanswered probe is
    /// treated the same as an unreachable backend.
    pub health_timeout_secs: u64,

    /// Optional client-side timeout for upload requests, in seconds.
    /// Default: None (uploads run on the transport's own limits).
    ///
    /// Transcription of a 25 MiB memo can legitimately take minutes, so no
    /// default deadline is imposed.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            max_file_size: MAX_FILE_SIZE,
            max_retries: 3,
            retry_delay_ms: 1000,
            concurrency: 4,
            premium: false,
            health_interval_secs: 30,
            health_timeout_secs: 10,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        // A trailing slash would double up against the endpoint paths.
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_delay_ms(mut self, ms: u64) -> Self {
        self.config.retry_delay_ms = ms;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn premium(mut self, v: bool) -> Self {
        self.config.premium = v;
        self
    }

    pub fn health_interval_secs(mut self, secs: u64) -> Self {
        self.config.health_interval_secs = secs;
        self
    }

    pub fn health_timeout_secs(mut self, secs: u64) -> Self {
        self.config.health_timeout_secs = secs;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, VoxifyError> {
        let c = &self.config;
        if c.base_url.is_empty() {
            return Err(VoxifyError::InvalidConfig("base_url must not be empty".into()));
        }
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(VoxifyError::InvalidConfig(format!(
                "base_url must be an HTTP/HTTPS URL, got '{}'",
                c.base_url
            )));
        }
        if c.concurrency == 0 {
            return Err(VoxifyError::InvalidConfig("concurrency must be ≥ 1".into()));
        }
        if c.health_interval_secs == 0 {
            return Err(VoxifyError::InvalidConfig(
                "health_interval_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let c = ClientConfig::default();
        assert_eq!(c.max_file_size, 25 * 1024 * 1024);
        assert_eq!(c.max_retries, 3);
        assert_eq!(c.retry_delay_ms, 1000);
        assert_eq!(c.health_interval_secs, 30);
        assert!(!c.premium);
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let c = ClientConfig::builder()
            .base_url("http://localhost:8000/")
            .build()
            .unwrap();
        assert_eq!(c.base_url, "http://localhost:8000");
    }

    #[test]
    fn builder_rejects_non_http_url() {
        let err = ClientConfig::builder()
            .base_url("localhost:8000")
            .build()
            .unwrap_err();
        assert!(matches!(err, VoxifyError::InvalidConfig(_)));
    }

    #[test]
    fn concurrency_clamped_to_one() {
        let c = ClientConfig::builder().concurrency(0).build().unwrap();
        assert_eq!(c.concurrency, 1);
    }
}
