//! Output types: scenes, image references and the assembled storyboard.

use crate::error::SearchFailure;
use crate::pipeline::script::render_script;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One narration unit cut from the input text.
///
/// `text` is trimmed and always longer than 10 characters; `keywords` holds
/// at most three space-separated lower-case tokens (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub text: String,
    pub keywords: String,
}

/// A single image attached to a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Medium-resolution image URL.
    pub url: String,
    /// Caption supplied by the service, or the search query when absent.
    pub alt: String,
}

/// A scene enriched with its images and display duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneResult {
    /// Narration text.
    pub text: String,
    /// Query used for the image search.
    pub keywords: String,
    /// Images in the order the service (or the fallback set) returned them.
    pub images: Vec<ImageRef>,
    /// Display duration in whole seconds.
    pub duration: u32,
    /// Set when placeholder images were substituted for search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<SearchFailure>,
}

impl SceneResult {
    /// Combine a scene with its resolved images.
    pub fn new(scene: Scene, images: Vec<ImageRef>, duration: u32) -> Self {
        Self {
            text: scene.text,
            keywords: scene.keywords,
            images,
            duration,
            fallback: None,
        }
    }

    /// Whether placeholder images were used for this scene.
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Aggregate numbers for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryboardStats {
    pub total_scenes: usize,
    /// Scenes whose images came from the search service.
    pub remote_scenes: usize,
    /// Scenes that received placeholder images.
    pub fallback_scenes: usize,
    pub total_images: usize,
    /// Sum of every scene's `duration`.
    pub total_duration_secs: u64,
    pub elapsed_ms: u64,
}

impl StoryboardStats {
    /// Tally the stats for an ordered list of scene results.
    pub fn from_scenes(scenes: &[SceneResult], elapsed_ms: u64) -> Self {
        let fallback_scenes = scenes.iter().filter(|s| s.used_fallback()).count();
        Self {
            total_scenes: scenes.len(),
            remote_scenes: scenes.len() - fallback_scenes,
            fallback_scenes,
            total_images: scenes.iter().map(|s| s.images.len()).sum(),
            total_duration_secs: total_duration(scenes),
            elapsed_ms,
        }
    }
}

/// The ordered scene results of one run plus their stats.
///
/// An empty `scenes` list means the text contained nothing long enough to
/// become a scene; it is not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Storyboard {
    pub scenes: Vec<SceneResult>,
    pub stats: StoryboardStats,
}

impl Storyboard {
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Render the plain-text script for this storyboard.
    pub fn script(&self, title: &str, generated_at: NaiveDateTime) -> String {
        render_script(&self.scenes, generated_at, title)
    }
}

/// Sum of scene durations in seconds.
pub fn total_duration(scenes: &[SceneResult]) -> u64 {
    scenes.iter().map(|s| u64::from(s.duration)).sum()
}
