//! # voxify
//!
//! Turn voice memos into structured documents using an AI backend.
//!
//! ## Why this crate?
//!
//! A voice memo is the fastest way to capture thinking and the slowest thing
//! to act on afterwards. The Voxify backend transcribes a memo and structures
//! it into one of four shapes: a prioritised task board, a strategic
//! roadmap, step-by-step process documentation, or a "constellation" insight
//! graph. This crate is the client side: it validates the audio file, drives
//! the upload with a bounded retry policy, decodes the format-specific JSON
//! response, and renders it as typed sections plus an assembled Markdown
//! document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! voice memo (mp3 / m4a / wav)
//!  │
//!  ├─ 1. Validate  media type, 25 MiB ceiling, premium gating (local, no I/O)
//!  ├─ 2. Upload    multipart POST to the format's endpoint, linear-backoff
//!  │               retry on 5xx (3 retries: 1 s → 2 s → 3 s)
//!  ├─ 3. Decode    JSON body → typed payload for the selected format
//!  └─ 4. Render    payload → ordered sections → Markdown document
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use voxify::{process_memo, ClientConfig, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://localhost:8000")
//!         .build()?;
//!     let doc = process_memo("standup.mp3", OutputFormat::Tasks, &config).await?;
//!     println!("{}", doc.markdown);
//!     eprintln!("{} attempts, {}ms", doc.stats.attempts, doc.stats.total_ms);
//!     Ok(())
//! }
//! ```
//!
//! Interactive hosts (anything with a step indicator and a format picker)
//! use [`SessionController`] instead, which owns the selected format, the
//! linear step state, and a background health monitor that flips the
//! demo-mode flag when the backend degrades or goes unreachable.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `voxify` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! voxify = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod format;
pub mod payload;
pub mod pipeline;
pub mod process;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder, MAX_FILE_SIZE};
pub use error::VoxifyError;
pub use format::{FormatMetadata, FormatSelector, OutputFormat};
pub use payload::{HealthReport, ProcessedResult};
pub use pipeline::render::{assemble_document, render, Section};
pub use pipeline::upload::{classify_status, RetryClass, UploadClient, UploadOutcome};
pub use pipeline::validate::{format_file_size, resolve_audio, validate, AudioSource};
pub use process::{
    check_health, process_many, process_memo, process_memo_to_file, MemoStats, ProcessedDocument,
};
pub use session::{probe_health, BackendStatus, SessionController, Step};
