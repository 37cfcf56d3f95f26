//! # story2board
//!
//! Turn prose into a storyboard: one scene per sentence, a short keyword
//! query per scene, stock photos for each query, and a plain-text script
//! ready to take into a video editor.
//!
//! Nothing is rendered or encoded here. The "video" is the script plus the
//! image references; the actual edit happens elsewhere.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text
//!  │
//!  ├─ 1. Segment   split on . ! ? and drop fragments of ≤ 10 chars
//!  ├─ 2. Keywords  first three non-stop-words longer than 2 chars
//!  ├─ 3. Images    Pexels search (landscape), placeholders on any failure
//!  └─ 4. Script    header + one block per scene + totals
//! ```
//!
//! The image stage never fails. Without an API key, or when the service
//! misbehaves, each scene gets the fixed placeholder images and
//! [`SceneResult::fallback`] records why.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use story2board::{generate, StoryboardConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = StoryboardConfig::builder()
//!         .credential(std::env::var("PEXELS_API_KEY").unwrap_or_default())
//!         .images_per_scene(3)
//!         .build()
//!         .unwrap();
//!     let board = generate("The brave astronaut found a glowing crystal.", &config).await;
//!     for scene in &board.scenes {
//!         println!("{} [{}] → {} images", scene.text, scene.keywords, scene.images.len());
//!     }
//!     println!("{}", board.script("Video Script", chrono::Local::now().naive_local()));
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `story2board` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{StoryboardConfig, StoryboardConfigBuilder};
pub use error::{SearchFailure, StoryboardError};
pub use generate::{
    download_images, generate, generate_scenes, generate_sync, generate_to_file, write_script,
    DownloadStats,
};
pub use output::{ImageRef, Scene, SceneResult, Storyboard, StoryboardStats};
pub use pipeline::images::{
    placeholder_images, ImageResolver, PexelsClient, PhotoSearch, RawResponse, ResolvedImages,
    SearchOutcome, SearchRequest,
};
pub use pipeline::input::{check_input, read_text_file, InputCheck};
pub use pipeline::keywords::extract_keywords;
pub use pipeline::script::{render_script, SCRIPT_FILE_NAME, SCRIPT_MIME_TYPE};
pub use pipeline::segment::{process_text, split_sentences};
pub use progress::{NoopProgressCallback, ProgressCallback, StoryboardProgressCallback};
pub use stream::{generate_stream, SceneStream};
