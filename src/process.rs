//! Eager entry points: one call takes a memo from path to rendered document.
//!
//! These are the simple APIs for callers that don't need the interactive
//! session machinery: scripts, batch jobs, the CLI in non-interactive mode.
//! Each call is self-contained: resolve the file, validate it, upload it,
//! render the result, and return everything a host could want to show.

use crate::config::ClientConfig;
use crate::error::VoxifyError;
use crate::format::OutputFormat;
use crate::payload::ProcessedResult;
use crate::pipeline::render::{assemble_document, render, Section};
use crate::pipeline::upload::UploadClient;
use crate::pipeline::validate::{self, AudioSource};
use crate::session::{probe_health, BackendStatus};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Cost accounting for one processed memo.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoStats {
    /// Size of the uploaded file in bytes.
    pub file_size: u64,
    /// HTTP requests sent, including the successful one.
    pub attempts: u32,
    /// Wall-clock time spent in the upload (including retry back-off).
    pub upload_ms: u64,
    /// End-to-end wall-clock time for the call.
    pub total_ms: u64,
}

/// Everything produced for one memo: the decoded payload, its display
/// sections, the assembled Markdown document, and the stats.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub format: OutputFormat,
    pub sections: Vec<Section>,
    pub markdown: String,
    pub result: ProcessedResult,
    pub stats: MemoStats,
}

/// Process a single voice memo.
///
/// # Errors
/// Validation errors (wrong type, too large, premium gating) return before
/// any network traffic. Transport and server errors follow the retry policy
/// in [`crate::pipeline::upload`].
pub async fn process_memo(
    input: impl AsRef<Path>,
    format: OutputFormat,
    config: &ClientConfig,
) -> Result<ProcessedDocument, VoxifyError> {
    let source = validate::resolve_audio(input)?;
    validate::validate(&source, format, config)?;

    let client = UploadClient::new(config)?;
    run_upload(&client, &source, format).await
}

/// Pipeline drive for callers that already hold an HTTP client and a
/// resolved, validated source (the session controller).
pub(crate) async fn run_pipeline(
    http: &reqwest::Client,
    source: &AudioSource,
    format: OutputFormat,
    config: &ClientConfig,
) -> Result<ProcessedDocument, VoxifyError> {
    let client = UploadClient::with_http(http.clone(), config);
    run_upload(&client, source, format).await
}

async fn run_upload(
    client: &UploadClient,
    source: &AudioSource,
    format: OutputFormat,
) -> Result<ProcessedDocument, VoxifyError> {
    let start = Instant::now();
    let outcome = client.upload(source, format).await?;
    let sections = render(&outcome.result);
    let markdown = assemble_document(&sections);

    let stats = MemoStats {
        file_size: source.size,
        attempts: outcome.attempts,
        upload_ms: outcome.duration_ms,
        total_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "'{}' done: {format}, {} sections, {} attempts, {}ms",
        source.file_name,
        sections.len(),
        stats.attempts,
        stats.total_ms
    );

    Ok(ProcessedDocument {
        format,
        sections,
        markdown,
        result: outcome.result,
        stats,
    })
}

/// Process a memo and write the Markdown document to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn process_memo_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    format: OutputFormat,
    config: &ClientConfig,
) -> Result<MemoStats, VoxifyError> {
    let document = process_memo(input, format, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                VoxifyError::Internal(format!("create {}: {e}", parent.display()))
            })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &document.markdown)
        .await
        .map_err(|e| VoxifyError::Internal(format!("write {}: {e}", tmp_path.display())))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| VoxifyError::Internal(format!("rename to {}: {e}", path.display())))?;

    Ok(document.stats)
}

/// Process several memos concurrently with the same format.
///
/// Uploads are fully independent; results come back in completion order,
/// each paired with its input path. A failed memo does not affect the
/// others.
pub async fn process_many(
    inputs: &[PathBuf],
    format: OutputFormat,
    config: &ClientConfig,
) -> Vec<(PathBuf, Result<ProcessedDocument, VoxifyError>)> {
    let client = match UploadClient::new(config) {
        Ok(c) => c,
        Err(e) => {
            // Client construction failing is fatal for every input alike.
            let reason = e.to_string();
            return inputs
                .iter()
                .map(|p| (p.clone(), Err(VoxifyError::Internal(reason.clone()))))
                .collect();
        }
    };

    stream::iter(inputs.iter().cloned().map(|path| {
        let client = client.clone();
        let config = config.clone();
        async move {
            let result = async {
                let source = validate::resolve_audio(&path)?;
                validate::validate(&source, format, &config)?;
                run_upload(&client, &source, format).await
            }
            .await;
            (path, result)
        }
    }))
    .buffer_unordered(config.concurrency)
    .collect()
    .await
}

/// Probe backend health once, without constructing a session.
pub async fn check_health(config: &ClientConfig) -> Result<BackendStatus, VoxifyError> {
    let http = reqwest::Client::builder()
        .build()
        .map_err(|e| VoxifyError::Internal(format!("http client: {e}")))?;
    Ok(probe_health(&http, config).await)
}
