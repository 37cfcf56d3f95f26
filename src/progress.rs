//! Progress-callback trait for per-scene generation events.
//!
//! Inject an [`Arc<dyn StoryboardProgressCallback>`] via
//! [`crate::config::StoryboardConfigBuilder::progress_callback`] to receive
//! events as the pipeline resolves images for each scene. The library knows
//! nothing about how the host shows progress: a terminal bar, a log line or
//! a channel to a UI thread all plug in the same way.
//!
//! # Example
//!
//! ```rust
//! use story2board::{StoryboardConfig, StoryboardProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl StoryboardProgressCallback for CountingCallback {
//!     fn on_scene_complete(&self, scene_num: usize, total_scenes: usize, image_count: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Scene {}/{} done ({} images)", scene_num, total_scenes, image_count);
//!     }
//! }
//!
//! let config = StoryboardConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as it processes each scene.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` scene
/// events may arrive from different tasks and out of order. All methods
/// default to no-ops.
pub trait StoryboardProgressCallback: Send + Sync {
    /// Called once after segmentation, before any image search.
    fn on_generation_start(&self, total_scenes: usize) {
        let _ = total_scenes;
    }

    /// Called just before the image search for a scene (1-indexed).
    fn on_scene_start(&self, scene_num: usize, total_scenes: usize) {
        let _ = (scene_num, total_scenes);
    }

    /// Called when a scene has its images, whatever their source.
    fn on_scene_complete(&self, scene_num: usize, total_scenes: usize, image_count: usize) {
        let _ = (scene_num, total_scenes, image_count);
    }

    /// Called before `on_scene_complete` when placeholder images were used.
    ///
    /// `reason` is the human-readable [`crate::error::SearchFailure`].
    fn on_scene_fallback(&self, scene_num: usize, total_scenes: usize, reason: &str) {
        let _ = (scene_num, total_scenes, reason);
    }

    /// Called once after every scene has been resolved.
    fn on_generation_complete(&self, total_scenes: usize, fallback_scenes: usize) {
        let _ = (total_scenes, fallback_scenes);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl StoryboardProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::StoryboardConfig`].
pub type ProgressCallback = Arc<dyn StoryboardProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        fallbacks: AtomicUsize,
        finished_fallbacks: AtomicUsize,
    }

    impl StoryboardProgressCallback for TrackingCallback {
        fn on_generation_start(&self, total_scenes: usize) {
            self.started_total.store(total_scenes, Ordering::SeqCst);
        }

        fn on_scene_start(&self, _scene_num: usize, _total_scenes: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_scene_complete(&self, _scene_num: usize, _total_scenes: usize, _image_count: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_scene_fallback(&self, _scene_num: usize, _total_scenes: usize, _reason: &str) {
            self.fallbacks.fetch_add(1, Ordering::SeqCst);
        }

        fn on_generation_complete(&self, _total_scenes: usize, fallback_scenes: usize) {
            self.finished_fallbacks.store(fallback_scenes, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_generation_start(2);
        cb.on_scene_start(1, 2);
        cb.on_scene_fallback(1, 2, "no key");
        cb.on_scene_complete(1, 2, 3);
        cb.on_generation_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_generation_start(2);
        tracker.on_scene_start(1, 2);
        tracker.on_scene_complete(1, 2, 3);
        tracker.on_scene_start(2, 2);
        tracker.on_scene_fallback(2, 2, "HTTP 500");
        tracker.on_scene_complete(2, 2, 3);
        tracker.on_generation_complete(2, 1);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.fallbacks.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.finished_fallbacks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_generation_start(10);
        cb.on_scene_complete(1, 10, 1);
    }
}
