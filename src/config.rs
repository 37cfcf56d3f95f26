//! Configuration types for storyboard generation.
//!
//! All behaviour is controlled through [`StoryboardConfig`], built via its
//! [`StoryboardConfigBuilder`]. The image-search credential lives here as a
//! plain field rather than in process-wide state, so a resolver can be built
//! with or without one in the same process (and in tests).

use crate::error::StoryboardError;
use crate::pipeline::images::{PhotoSearch, PEXELS_SEARCH_URL};
use crate::progress::ProgressCallback;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Allowed number of images per scene.
pub const IMAGES_PER_SCENE_RANGE: RangeInclusive<usize> = 1..=3;

/// Allowed display duration per scene, in seconds.
pub const SCENE_DURATION_RANGE: RangeInclusive<u32> = 2..=10;

/// Configuration for a storyboard run.
///
/// # Example
/// ```rust
/// use story2board::StoryboardConfig;
///
/// let config = StoryboardConfig::builder()
///     .credential("my-pexels-key")
///     .images_per_scene(3)
///     .scene_duration_secs(6)
///     .build()
///     .unwrap();
/// assert_eq!(config.images_per_scene, 3);
/// ```
#[derive(Clone)]
pub struct StoryboardConfig {
    /// Pexels API key. `None` means every scene gets placeholder images.
    pub credential: Option<String>,

    /// Images requested per scene. Range: 1–3. Default: 1.
    pub images_per_scene: usize,

    /// Display duration of each scene in seconds. Range: 2–10. Default: 4.
    pub scene_duration_secs: u32,

    /// Per-request timeout for the image search, in seconds. Default: 10.
    pub api_timeout_secs: u64,

    /// Search endpoint. Default: the Pexels v1 search URL.
    pub endpoint: String,

    /// Scenes resolved at once. Default: 1 (strictly sequential).
    ///
    /// Values above 1 overlap the network waits; results keep scene order.
    pub concurrency: usize,

    /// First line of the generated script.
    pub script_title: String,

    /// Pre-constructed search transport. Takes precedence over `endpoint`.
    pub photo_search: Option<Arc<dyn PhotoSearch>>,

    /// Receives per-scene progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for StoryboardConfig {
    fn default() -> Self {
        Self {
            credential: None,
            images_per_scene: 1,
            scene_duration_secs: 4,
            api_timeout_secs: 10,
            endpoint: PEXELS_SEARCH_URL.to_string(),
            concurrency: 1,
            script_title: "Video Script".to_string(),
            photo_search: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for StoryboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryboardConfig")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("images_per_scene", &self.images_per_scene)
            .field("scene_duration_secs", &self.scene_duration_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("endpoint", &self.endpoint)
            .field("concurrency", &self.concurrency)
            .field("script_title", &self.script_title)
            .field(
                "photo_search",
                &self.photo_search.as_ref().map(|_| "<dyn PhotoSearch>"),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl StoryboardConfig {
    /// Create a new builder for `StoryboardConfig`.
    pub fn builder() -> StoryboardConfigBuilder {
        StoryboardConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`StoryboardConfig`].
#[derive(Debug)]
pub struct StoryboardConfigBuilder {
    config: StoryboardConfig,
}

impl StoryboardConfigBuilder {
    /// Set the API key. Blank strings are treated as no key.
    pub fn credential(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.config.credential = if key.trim().is_empty() {
            None
        } else {
            Some(key)
        };
        self
    }

    pub fn images_per_scene(mut self, n: usize) -> Self {
        self.config.images_per_scene = n.clamp(
            *IMAGES_PER_SCENE_RANGE.start(),
            *IMAGES_PER_SCENE_RANGE.end(),
        );
        self
    }

    pub fn scene_duration_secs(mut self, secs: u32) -> Self {
        self.config.scene_duration_secs =
            secs.clamp(*SCENE_DURATION_RANGE.start(), *SCENE_DURATION_RANGE.end());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn script_title(mut self, title: impl Into<String>) -> Self {
        self.config.script_title = title.into();
        self
    }

    pub fn photo_search(mut self, search: Arc<dyn PhotoSearch>) -> Self {
        self.config.photo_search = Some(search);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<StoryboardConfig, StoryboardError> {
        let c = &self.config;
        if !IMAGES_PER_SCENE_RANGE.contains(&c.images_per_scene) {
            return Err(StoryboardError::InvalidConfig(format!(
                "images per scene must be 1–3, got {}",
                c.images_per_scene
            )));
        }
        if !SCENE_DURATION_RANGE.contains(&c.scene_duration_secs) {
            return Err(StoryboardError::InvalidConfig(format!(
                "scene duration must be 2–10 seconds, got {}",
                c.scene_duration_secs
            )));
        }
        if c.api_timeout_secs == 0 {
            return Err(StoryboardError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.photo_search.is_none()
            && !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://"))
        {
            return Err(StoryboardError::InvalidConfig(format!(
                "endpoint must be an HTTP/HTTPS URL, got '{}'",
                c.endpoint
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = StoryboardConfig::default();
        assert_eq!(c.images_per_scene, 1);
        assert_eq!(c.scene_duration_secs, 4);
        assert_eq!(c.api_timeout_secs, 10);
        assert_eq!(c.concurrency, 1);
        assert_eq!(c.endpoint, PEXELS_SEARCH_URL);
        assert!(c.credential.is_none());
    }

    #[test]
    fn builder_clamps_ranges() {
        let c = StoryboardConfig::builder()
            .images_per_scene(9)
            .scene_duration_secs(1)
            .concurrency(0)
            .build()
            .unwrap();
        assert_eq!(c.images_per_scene, 3);
        assert_eq!(c.scene_duration_secs, 2);
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn blank_credential_is_none() {
        let c = StoryboardConfig::builder().credential("   ").build().unwrap();
        assert!(c.credential.is_none());
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = StoryboardConfig::builder()
            .api_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let err = StoryboardConfig::builder()
            .endpoint("ftp://pexels")
            .build()
            .unwrap_err();
        assert!(matches!(err, StoryboardError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_credential() {
        let c = StoryboardConfig::builder().credential("secret-key").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains("<redacted>"));
    }
}
