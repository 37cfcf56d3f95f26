//! Input handling: read story text from disk and sanity-check its length.
//!
//! The core accepts any string; these helpers exist for front ends. Reading
//! fails only for files that cannot be opened or are not UTF-8 text. The
//! length check is advisory: it tells the caller whether the text is worth
//! processing, it never rejects anything by itself.

use crate::error::StoryboardError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Minimum trimmed length, in characters, recommended before generating.
pub const DEFAULT_MIN_INPUT_CHARS: usize = 50;

/// Result of [`check_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCheck {
    /// Nothing but whitespace.
    Empty,
    /// Shorter than the recommended minimum.
    TooShort { len: usize, min: usize },
    Ok,
}

/// Classify `text` against a minimum trimmed length.
pub fn check_input(text: &str, min_chars: usize) -> InputCheck {
    let len = text.trim().chars().count();
    if len == 0 {
        InputCheck::Empty
    } else if len < min_chars {
        InputCheck::TooShort {
            len,
            min: min_chars,
        }
    } else {
        InputCheck::Ok
    }
}

/// Read a plain-text story file.
pub async fn read_text_file(path: impl AsRef<Path>) -> Result<String, StoryboardError> {
    let path: PathBuf = path.as_ref().to_path_buf();

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoryboardError::InputNotFound { path })
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(StoryboardError::PermissionDenied { path })
        }
        Err(e) => {
            return Err(StoryboardError::UnsupportedInput {
                path,
                reason: e.to_string(),
            })
        }
    };

    let text = String::from_utf8(bytes).map_err(|e| StoryboardError::UnsupportedInput {
        path: path.clone(),
        reason: format!("not valid UTF-8 text ({})", e.utf8_error()),
    })?;

    debug!("Read {} chars from {}", text.len(), path.display());
    Ok(text)
}
