//! Streaming generation API: emit scenes as they are resolved.
//!
//! Unlike the eager [`crate::generate::generate`], which returns only after
//! every image search has finished, [`generate_stream`] yields each
//! [`SceneResult`] as soon as it is ready. Scenes always arrive in story
//! order, also when `concurrency > 1`.

use crate::config::StoryboardConfig;
use crate::generate::process_scene;
use crate::output::SceneResult;
use crate::pipeline::images::ImageResolver;
use crate::pipeline::segment;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of scene results.
pub type SceneStream = Pin<Box<dyn Stream<Item = SceneResult> + Send>>;

/// Segment `text` and stream its scenes with resolved images.
///
/// Returns an empty stream when the text yields no scenes. The progress
/// callback receives the per-scene events; `on_generation_start` fires here,
/// and `on_generation_complete` once the stream is exhausted.
///
/// # Example
/// ```rust,no_run
/// use story2board::{generate_stream, StoryboardConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut scenes = generate_stream("The ship left port at dawn.", &StoryboardConfig::default());
/// while let Some(scene) = scenes.next().await {
///     println!("{} → {} images", scene.text, scene.images.len());
/// }
/// # }
/// ```
pub fn generate_stream(text: impl AsRef<str>, config: &StoryboardConfig) -> SceneStream {
    let scenes = segment::process_text(text.as_ref());
    let total = scenes.len();
    info!("Starting streaming generation: {} scenes", total);

    let config = Arc::new(config.clone());
    let resolver = Arc::new(ImageResolver::from_config(&config));
    let concurrency = config.concurrency.max(1);

    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_start(total);
    }

    let done_config = Arc::clone(&config);
    let fallback_count = Arc::new(AtomicUsize::new(0));
    let done_count = Arc::clone(&fallback_count);

    let scenes_stream = stream::iter(scenes.into_iter().enumerate())
        .map(move |(idx, scene)| {
            let resolver = Arc::clone(&resolver);
            let config = Arc::clone(&config);
            let fallback_count = Arc::clone(&fallback_count);
            async move {
                let result = process_scene(&resolver, scene, idx + 1, total, &config).await;
                if result.used_fallback() {
                    fallback_count.fetch_add(1, Ordering::SeqCst);
                }
                result
            }
        })
        .buffered(concurrency);

    // Trailing no-item stream that fires the completion event.
    let completion = stream::once(async move {
        if let Some(ref cb) = done_config.progress_callback {
            cb.on_generation_complete(total, done_count.load(Ordering::SeqCst));
        }
    })
    .filter_map(|_| async { None::<SceneResult> });

    Box::pin(scenes_stream.chain(completion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::images::placeholder_images;

    #[tokio::test]
    async fn streams_scenes_in_order() {
        let text = "The caravan crossed the dunes. A sandstorm hid the sun. They reached the oasis at dusk.";
        let config = StoryboardConfig::builder()
            .images_per_scene(2)
            .concurrency(3)
            .build()
            .unwrap();
        let scenes: Vec<SceneResult> = generate_stream(text, &config).collect().await;
        assert_eq!(scenes.len(), 3);
        assert_eq!(scenes[0].text, "The caravan crossed the dunes");
        assert_eq!(scenes[1].text, "A sandstorm hid the sun");
        assert_eq!(scenes[2].text, "They reached the oasis at dusk");
        for s in &scenes {
            assert_eq!(s.images, placeholder_images(2));
        }
    }

    #[tokio::test]
    async fn empty_text_streams_nothing() {
        let scenes: Vec<SceneResult> =
            generate_stream("", &StoryboardConfig::default()).collect().await;
        assert!(scenes.is_empty());
    }
}
