//! Eager (whole-story) generation entry points.
//!
//! [`generate`] segments the text, resolves images for every scene and
//! returns the finished [`Storyboard`]. Use
//! [`crate::stream::generate_stream`] instead to receive scenes one at a
//! time as they are resolved.

use crate::config::StoryboardConfig;
use crate::error::StoryboardError;
use crate::output::{Scene, SceneResult, Storyboard, StoryboardStats};
use crate::pipeline::images::{self, ImageResolver};
use crate::pipeline::segment;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turn prose into a storyboard.
///
/// This is the primary entry point for the library. It cannot fail: image
/// search problems become placeholder images, and text with no usable
/// sentences yields an empty storyboard (check [`Storyboard::is_empty`]).
///
/// # Example
/// ```rust,no_run
/// use story2board::{generate, StoryboardConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = StoryboardConfig::default(); // no API key: placeholder images
/// let board = generate("The brave astronaut found a glowing crystal.", &config).await;
/// assert_eq!(board.scenes.len(), 1);
/// # }
/// ```
pub async fn generate(text: impl AsRef<str>, config: &StoryboardConfig) -> Storyboard {
    let start = Instant::now();
    let text = text.as_ref();
    info!("Starting storyboard generation: {} chars", text.len());

    // ── Step 1: Segment + keywords ───────────────────────────────────────
    let scenes = segment::process_text(text);
    if scenes.is_empty() {
        info!("No scenes found; nothing to process");
        return Storyboard::default();
    }
    info!("Processed text into {} scenes", scenes.len());

    // ── Step 2: Resolve images ───────────────────────────────────────────
    let results = generate_scenes(scenes, config).await;

    // ── Step 3: Stats ────────────────────────────────────────────────────
    let stats = StoryboardStats::from_scenes(&results, start.elapsed().as_millis() as u64);
    info!(
        "Storyboard complete: {} scenes ({} with placeholder images), {}s total, {}ms",
        stats.total_scenes, stats.fallback_scenes, stats.total_duration_secs, stats.elapsed_ms
    );

    Storyboard {
        scenes: results,
        stats,
    }
}

/// Resolve images for already-segmented scenes, preserving their order.
///
/// Fires the configured progress callback around the whole batch and for
/// every scene.
pub async fn generate_scenes(scenes: Vec<Scene>, config: &StoryboardConfig) -> Vec<SceneResult> {
    let total = scenes.len();
    let resolver = ImageResolver::from_config(config);

    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_start(total);
    }

    let results = if config.concurrency > 1 {
        process_concurrent(&resolver, scenes, config).await
    } else {
        process_sequential(&resolver, scenes, config).await
    };

    if let Some(ref cb) = config.progress_callback {
        let fallback = results.iter().filter(|r| r.used_fallback()).count();
        cb.on_generation_complete(total, fallback);
    }

    results
}

/// Resolve one scene and report it to the progress callback.
pub(crate) async fn process_scene(
    resolver: &ImageResolver,
    scene: Scene,
    scene_num: usize,
    total: usize,
    config: &StoryboardConfig,
) -> SceneResult {
    if let Some(ref cb) = config.progress_callback {
        cb.on_scene_start(scene_num, total);
    }
    debug!("Scene {}/{}: query '{}'", scene_num, total, scene.keywords);

    let resolved = resolver
        .resolve_detailed(&scene.keywords, config.images_per_scene)
        .await;

    let mut result = SceneResult::new(scene, resolved.images, config.scene_duration_secs);
    result.fallback = resolved.fallback;

    if let Some(ref cb) = config.progress_callback {
        if let Some(ref failure) = result.fallback {
            cb.on_scene_fallback(scene_num, total, &failure.to_string());
        }
        cb.on_scene_complete(scene_num, total, result.images.len());
    }
    result
}

/// One scene at a time, in order (concurrency = 1).
async fn process_sequential(
    resolver: &ImageResolver,
    scenes: Vec<Scene>,
    config: &StoryboardConfig,
) -> Vec<SceneResult> {
    let total = scenes.len();
    let mut results = Vec::with_capacity(total);
    for (idx, scene) in scenes.into_iter().enumerate() {
        results.push(process_scene(resolver, scene, idx + 1, total, config).await);
    }
    results
}

/// Overlapping searches; `buffered` keeps output in scene order.
async fn process_concurrent(
    resolver: &ImageResolver,
    scenes: Vec<Scene>,
    config: &StoryboardConfig,
) -> Vec<SceneResult> {
    let total = scenes.len();
    stream::iter(
        scenes
            .into_iter()
            .enumerate()
            .map(|(idx, scene)| process_scene(resolver, scene, idx + 1, total, config)),
    )
    .buffered(config.concurrency)
    .collect()
    .await
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    text: impl AsRef<str>,
    config: &StoryboardConfig,
) -> Result<Storyboard, StoryboardError> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        StoryboardError::Internal(format!("Failed to create tokio runtime: {}", e))
    })?;
    Ok(runtime.block_on(generate(text, config)))
}

/// Generate a storyboard and write its script to `output_path`.
///
/// Returns the storyboard so callers can still show a preview.
pub async fn generate_to_file(
    text: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &StoryboardConfig,
) -> Result<Storyboard, StoryboardError> {
    let board = generate(text, config).await;
    write_script(&board, output_path, config).await?;
    Ok(board)
}

/// Write the storyboard's script, stamped with the local time.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_script(
    board: &Storyboard,
    output_path: impl AsRef<Path>,
    config: &StoryboardConfig,
) -> Result<(), StoryboardError> {
    let path = output_path.as_ref();
    let write_err = |source| StoryboardError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let script = board.script(&config.script_title, chrono::Local::now().naive_local());
    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, script.as_bytes())
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    info!("Wrote script to {}", path.display());
    Ok(())
}

/// Outcome of [`download_images`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DownloadStats {
    pub saved: Vec<PathBuf>,
    pub failed: usize,
}

/// Save every scene image into `dir` as `scene_{k}_{j}.{ext}`.
///
/// Individual download failures are counted, not returned; only failing to
/// create `dir` (or to write a file) is an error.
pub async fn download_images(
    board: &Storyboard,
    dir: impl AsRef<Path>,
    config: &StoryboardConfig,
) -> Result<DownloadStats, StoryboardError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StoryboardError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    let client = images::http_client(config.api_timeout_secs)
        .map_err(|e| StoryboardError::Internal(format!("HTTP client: {e}")))?;

    let mut stats = DownloadStats::default();
    for (k, scene) in board.scenes.iter().enumerate() {
        for (j, image) in scene.images.iter().enumerate() {
            let Some(bytes) = images::download_image(&client, &image.url).await else {
                stats.failed += 1;
                continue;
            };
            let path = dir.join(format!(
                "scene_{}_{}.{}",
                k + 1,
                j + 1,
                image_extension(&image.url)
            ));
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| StoryboardError::OutputWriteFailed {
                    path: path.clone(),
                    source: e,
                })?;
            stats.saved.push(path);
        }
    }

    if stats.failed > 0 {
        warn!("{} images could not be downloaded", stats.failed);
    }
    info!("Saved {} images to {}", stats.saved.len(), dir.display());
    Ok(stats)
}

/// File extension from the URL path, defaulting to `jpg`.
fn image_extension(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut s| s.next_back().map(str::to_string))
        })
        .and_then(|last| {
            last.rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
        })
        .filter(|ext| !ext.is_empty() && ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "jpg".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ImageRef;

    #[test]
    fn extension_from_url() {
        assert_eq!(image_extension("https://images.pexels.com/p/1.jpeg?w=350"), "jpeg");
        assert_eq!(image_extension("https://x.test/a/b.PNG"), "png");
        assert_eq!(
            image_extension("https://via.placeholder.com/800x600/4A90E2/FFFFFF?text=Scene+1"),
            "jpg"
        );
        assert_eq!(image_extension("not a url"), "jpg");
    }

    #[tokio::test]
    async fn empty_text_yields_empty_storyboard() {
        let board = generate("Too short. Tiny!", &StoryboardConfig::default()).await;
        assert!(board.is_empty());
        assert_eq!(board.stats.total_scenes, 0);
    }

    #[tokio::test]
    async fn durations_come_from_config() {
        let config = StoryboardConfig::builder()
            .scene_duration_secs(7)
            .build()
            .unwrap();
        let board = generate(
            "The lighthouse keeper lit the lamp. Ships passed safely through the night.",
            &config,
        )
        .await;
        assert_eq!(board.scenes.len(), 2);
        assert!(board.scenes.iter().all(|s| s.duration == 7));
        assert_eq!(board.stats.total_duration_secs, 14);
    }

    #[test]
    fn sync_wrapper_runs() {
        let board = generate_sync(
            "A quiet village slept beneath the snow.",
            &StoryboardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.scenes.len(), 1);
        assert_eq!(board.scenes[0].images.len(), 1);
    }

    // ── Image download ───────────────────────────────────────────────────

    fn board_with_urls(urls: &[&str]) -> Storyboard {
        let scene = SceneResult {
            text: "A harbour at first light".into(),
            keywords: "harbour first light".into(),
            images: urls
                .iter()
                .map(|u| ImageRef {
                    url: (*u).into(),
                    alt: "harbour".into(),
                })
                .collect(),
            duration: 4,
            fallback: None,
        };
        Storyboard {
            stats: StoryboardStats::from_scenes(std::slice::from_ref(&scene), 0),
            scenes: vec![scene],
        }
    }

    /// Serve `body` as an image to a single connection.
    async fn serve_image(body: &'static [u8]) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(header.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/photos/harbour.png")
    }

    #[tokio::test]
    async fn unreachable_image_is_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let board = board_with_urls(&["http://127.0.0.1:1/a.png"]);
        let stats = download_images(&board, dir.path(), &StoryboardConfig::default())
            .await
            .unwrap();
        assert_eq!(stats.failed, 1);
        assert!(stats.saved.is_empty());
    }

    #[tokio::test]
    async fn downloaded_images_are_named_by_scene_and_position() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_image(b"\x89PNG fake image bytes").await;
        let board = board_with_urls(&[url.as_str(), "http://127.0.0.1:1/b.jpg"]);

        let stats = download_images(&board, dir.path().join("images"), &StoryboardConfig::default())
            .await
            .unwrap();

        let expected = dir.path().join("images").join("scene_1_1.png");
        assert_eq!(stats.saved, vec![expected.clone()]);
        assert_eq!(stats.failed, 1);
        assert_eq!(std::fs::read(&expected).unwrap(), b"\x89PNG fake image bytes");
        assert!(!dir.path().join("images").join("scene_1_2.jpg").exists());
    }

    #[tokio::test]
    async fn download_dir_that_is_a_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = download_images(&board_with_urls(&[]), &blocker, &StoryboardConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoryboardError::OutputWriteFailed { .. }));
    }
}
