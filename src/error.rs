//! Error types for the voxify client library.
//!
//! One enum covers the whole pipeline, but the variants fall into the stages
//! a memo travels through:
//!
//! * **Validation**: the file never leaves the machine (wrong type, too
//!   large, plan gating). Cheap to recover from: pick another file or format.
//! * **Transport / HTTP**: the upload reached the network. 5xx responses are
//!   retried inside [`crate::pipeline::upload`]; what surfaces here is the
//!   terminal outcome after the retry budget is spent.
//! * **Decoding**: the backend answered 2xx but the body does not have the
//!   shape the selected format requires.
//!
//! [`VoxifyError::user_message`] rewords transport errors into the short,
//! friendly strings a host application can show in a status banner; the
//! `Display` impls keep the full detail for logs.

use crate::format::OutputFormat;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the voxify client.
#[derive(Debug, Error)]
pub enum VoxifyError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("audio file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file's media type is outside the accepted audio set.
    #[error("unsupported media type '{mime}'\nAccepted: MP3, M4A, and WAV voice memos.")]
    UnsupportedMediaType { mime: String },

    /// The file exceeds the upload size ceiling.
    #[error("file is {size} bytes, above the {limit}-byte upload ceiling")]
    FileTooLarge { size: u64, limit: u64 },

    /// The selected format is gated behind a premium plan the caller lacks.
    #[error("'{format}' output is a premium feature\nUpgrade the plan, or use the free 'tasks' format.")]
    PremiumRequired { format: OutputFormat },

    // ── Transport / HTTP errors ───────────────────────────────────────────
    /// The request never produced an HTTP response (refused, DNS, reset).
    ///
    /// Deliberately terminal: only server-error *responses* share the retry
    /// budget. See DESIGN.md for the recorded decision.
    #[error("could not reach the backend: {reason}")]
    Connection { reason: String },

    /// The backend kept answering in the 5xx range until the retry budget
    /// ran out. `detail` is the last server-supplied message.
    #[error("server error (HTTP {status}) after {attempts} attempts: {detail}")]
    Server {
        status: u16,
        attempts: u32,
        detail: String,
    },

    /// The backend rejected the request outright (4xx). Never retried.
    #[error("request rejected (HTTP {status}): {detail}")]
    Client { status: u16, detail: String },

    // ── Decoding errors ───────────────────────────────────────────────────
    /// 2xx response whose body lacks the fields the format requires.
    #[error("response is not a valid {format} payload: {detail}")]
    MalformedResult { format: OutputFormat, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VoxifyError {
    /// Short, friendly wording for a transient status banner.
    ///
    /// Hosts show this string for a few seconds and move on; the `Display`
    /// form stays available for logs. Transport failures get rewritten into
    /// plain language, everything else already reads well enough.
    pub fn user_message(&self) -> String {
        match self {
            VoxifyError::Connection { .. } => {
                "Unable to connect to server. Please check your internet connection.".to_string()
            }
            VoxifyError::Server { detail, .. } | VoxifyError::Client { detail, .. } => {
                detail.clone()
            }
            VoxifyError::MalformedResult { .. } => {
                "Processing finished but the result could not be displayed.".to_string()
            }
            VoxifyError::UnsupportedMediaType { .. } => {
                "Please upload an MP3, M4A, or WAV file".to_string()
            }
            VoxifyError::FileTooLarge { .. } => "File size must be under 25MB".to_string(),
            VoxifyError::PremiumRequired { .. } => {
                "This is a Pro feature. Upgrade to access.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// True when the caller can fix the problem locally without touching
    /// the network (bad file, gated format, bad config).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            VoxifyError::FileNotFound { .. }
                | VoxifyError::PermissionDenied { .. }
                | VoxifyError::UnsupportedMediaType { .. }
                | VoxifyError::FileTooLarge { .. }
                | VoxifyError::PremiumRequired { .. }
                | VoxifyError::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_display_carries_attempts_and_detail() {
        let e = VoxifyError::Server {
            status: 503,
            attempts: 4,
            detail: "model overloaded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("503"), "got: {msg}");
        assert!(msg.contains("4 attempts"), "got: {msg}");
        assert!(msg.contains("model overloaded"), "got: {msg}");
    }

    #[test]
    fn connection_user_message_is_friendly() {
        let e = VoxifyError::Connection {
            reason: "tcp connect error".into(),
        };
        assert_eq!(
            e.user_message(),
            "Unable to connect to server. Please check your internet connection."
        );
    }

    #[test]
    fn client_user_message_passes_server_detail_through() {
        let e = VoxifyError::Client {
            status: 400,
            detail: "File must be an audio file".into(),
        };
        assert_eq!(e.user_message(), "File must be an audio file");
    }

    #[test]
    fn validation_predicate() {
        assert!(VoxifyError::FileTooLarge { size: 1, limit: 0 }.is_validation());
        assert!(!VoxifyError::Connection { reason: "x".into() }.is_validation());
    }
}
