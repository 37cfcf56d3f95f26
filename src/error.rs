//! Error types for the story2board library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`StoryboardError`] is **fatal**: the run cannot proceed at all (input
//!   file unreadable, invalid configuration, script could not be written).
//!   Returned as `Err(StoryboardError)` from the top-level entry points.
//!
//! * [`SearchFailure`] is **non-fatal**: the image search for one scene did
//!   not produce usable results (no API key, HTTP 500, timeout, malformed
//!   JSON). It never leaves the image resolver as an error; it is recorded
//!   in [`crate::output::SceneResult::fallback`] next to the placeholder
//!   images that replaced the search results.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the story2board library.
///
/// Image-search failures use [`SearchFailure`] and are stored in
/// [`crate::output::SceneResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum StoryboardError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but is not usable plain text.
    #[error("Unsupported input '{path}': {reason}\nPlease provide a UTF-8 .txt file.")]
    UnsupportedInput { path: PathBuf, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file or directory.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why the image search for a scene fell back to placeholder images.
///
/// Every variant is absorbed by [`crate::pipeline::images::ImageResolver`];
/// callers only ever see it as a diagnostic next to a successful result.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum SearchFailure {
    /// No API key was configured.
    #[error("no image-search API key configured")]
    MissingCredential,

    /// The configured key is the unedited template value.
    #[error("image-search API key is still the placeholder value")]
    PlaceholderCredential,

    /// Keyword extraction left nothing to search for.
    #[error("empty search query")]
    EmptyQuery,

    /// The service answered with a non-success HTTP status.
    #[error("image-search API returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// Connection, DNS or TLS failure.
    #[error("image-search request failed: {detail}")]
    Transport { detail: String },

    /// No response within the per-request timeout.
    #[error("image-search request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The body was not the expected JSON shape.
    #[error("image-search response could not be parsed: {detail}")]
    MalformedPayload { detail: String },

    /// The HTTP client itself could not be built.
    #[error("image-search client unavailable: {detail}")]
    ClientUnavailable { detail: String },
}
