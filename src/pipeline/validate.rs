//! File validation: everything that can be checked before a byte is uploaded.
//!
//! ## Why validate locally?
//!
//! The backend enforces its own media-type and size limits, but a 25 MiB
//! ceiling means a rejected upload can waste minutes of the user's time on a
//! slow link. Every check here is cheap (a stat and an extension lookup), so
//! the full verdict is available before the network is involved.

use crate::config::ClientConfig;
use crate::error::VoxifyError;
use crate::format::OutputFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Media types the backend accepts for upload.
pub const ACCEPTED_MIME_TYPES: [&str; 4] =
    ["audio/mp3", "audio/mpeg", "audio/wav", "audio/x-m4a"];

/// A local audio file that has been resolved (exists, readable, sized)
/// but not yet validated against a format's upload rules.
#[derive(Debug, Clone)]
pub struct AudioSource {
    pub path: PathBuf,
    /// Best-effort media type, inferred from the extension unless supplied.
    pub mime: String,
    pub size: u64,
    /// File name sent as the multipart part's filename.
    pub file_name: String,
}

/// Resolve a path into an [`AudioSource`], checking existence and
/// readability and inferring the media type from the extension.
pub fn resolve_audio(path: impl AsRef<Path>) -> Result<AudioSource, VoxifyError> {
    let path = path.as_ref().to_path_buf();

    let metadata = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(VoxifyError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(VoxifyError::FileNotFound { path });
        }
    };
    if !metadata.is_file() {
        return Err(VoxifyError::FileNotFound { path });
    }

    let mime = infer_mime(&path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "memo".to_string());

    debug!("resolved audio source: {} ({mime})", path.display());

    Ok(AudioSource {
        mime,
        size: metadata.len(),
        file_name,
        path,
    })
}

/// Build an [`AudioSource`] with an explicitly known media type, for callers
/// that received the file from something other than the file system.
pub fn audio_source_with_mime(
    path: impl AsRef<Path>,
    mime: impl Into<String>,
) -> Result<AudioSource, VoxifyError> {
    let mut source = resolve_audio(path)?;
    source.mime = mime.into();
    Ok(source)
}

/// Check a resolved source against the upload rules for `format`.
///
/// Verdict order matches the order a user can act on: wrong file type,
/// oversized file, then plan gating. No side effects; the caller surfaces
/// the rejection.
pub fn validate(
    source: &AudioSource,
    format: OutputFormat,
    config: &ClientConfig,
) -> Result<(), VoxifyError> {
    if !is_accepted_mime(&source.mime) {
        return Err(VoxifyError::UnsupportedMediaType {
            mime: source.mime.clone(),
        });
    }

    if source.size > config.max_file_size {
        return Err(VoxifyError::FileTooLarge {
            size: source.size,
            limit: config.max_file_size,
        });
    }

    if format.is_premium() && !config.premium {
        return Err(VoxifyError::PremiumRequired { format });
    }

    Ok(())
}

/// Whether `mime` is in the accepted audio set.
pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime)
}

/// Infer a media type from the file extension.
///
/// Unknown extensions get a generic type that will fail validation with the
/// inferred string in the error, which reads better than "unknown".
fn infer_mime(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp3" | "mpeg" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/x-m4a",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Human-readable file size, e.g. `3.52 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[exp])
}
