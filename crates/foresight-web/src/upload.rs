//! Upload validation helpers: the extension allow-list and file name
//! sanitization applied before anything reaches the workflow.
use std::path::Path;

use crate::error::AppError;

/// Extensions accepted for dataset uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv"];

/// Whether an uploaded file name passes the extension gate: the substring
/// after the last `.`, compared case-insensitively against the allow-list.
pub fn allowed_file(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce an uploaded file name to a safe bare name: strip any directory
/// components, replace anything outside `[A-Za-z0-9._-]`, and drop leading
/// and trailing dots. Returns `None` when nothing usable remains.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whether a download request names a bare file inside the download
/// directory (no separators, no parent traversal).
pub fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && name != "."
        && name != ".."
}

/// Persist an upload into `dir` and return the stored name.
pub async fn save_upload(dir: &Path, name: &str, data: &[u8]) -> Result<String, AppError> {
    tokio::fs::write(dir.join(name), data)
        .await
        .map_err(|e| AppError::Internal(format!("could not save upload {}: {}", name, e)))?;
    Ok(name.to_string())
}
