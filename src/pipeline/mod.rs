//! Pipeline stages for text-to-storyboard generation.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and none knows how the others are driven.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ segment ──▶ keywords ──▶ images ──▶ script
//! (file)    (scenes)    (query)      (Pexels)   (text doc)
//! ```
//!
//! 1. [`input`]    : read a story file and check it is long enough to use
//! 2. [`segment`]  : split prose into sentence scenes
//! 3. [`keywords`] : derive a three-word search query per scene
//! 4. [`images`]   : search for photos; the only stage with network I/O,
//!    and the only one with a fallback path
//! 5. [`script`]   : render the finished scenes as a plain-text script

pub mod images;
pub mod input;
pub mod keywords;
pub mod script;
pub mod segment;
