//! Script rendering: scene results → a plain-text script document.
//!
//! The script is what users download to take into a video editor, so it is
//! laid out for reading, not parsing. Header totals and the closing summary
//! are computed from the same scene list they describe.

use crate::output::{total_duration, SceneResult};
use chrono::NaiveDateTime;

/// Download file name offered for the script.
pub const SCRIPT_FILE_NAME: &str = "video_script.txt";

/// MIME type of the script document.
pub const SCRIPT_MIME_TYPE: &str = "text/plain";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the script for `scenes`, stamped with `generated_at`.
///
/// Lines are joined with `\n`; the document has no trailing newline.
pub fn render_script(scenes: &[SceneResult], generated_at: NaiveDateTime, title: &str) -> String {
    let total = total_duration(scenes);
    let heavy = "=".repeat(50);

    let mut lines = vec![
        format!("# {}", title),
        format!("# Generated on: {}", generated_at.format(TIMESTAMP_FORMAT)),
        format!("# Total scenes: {}", scenes.len()),
        format!("# Total duration: {} seconds", total),
        String::new(),
        heavy.clone(),
        "COMPLETE VIDEO SCRIPT".to_string(),
        heavy,
        String::new(),
    ];

    for (i, scene) in scenes.iter().enumerate() {
        lines.extend(scene_block(i + 1, scene));
    }

    lines.push(format!("TOTAL VIDEO DURATION: {} seconds", total));
    lines.push(format!("TOTAL SCENES: {}", scenes.len()));
    lines.join("\n")
}

fn scene_block(scene_num: usize, scene: &SceneResult) -> Vec<String> {
    let mut block = vec![
        format!("SCENE {}", scene_num),
        "-".repeat(20),
        format!("Duration: {} seconds", scene.duration),
        format!("Keywords: {}", scene.keywords),
        format!("Narration: {}", scene.text),
        String::new(),
        "Images:".to_string(),
    ];
    block.extend(
        scene
            .images
            .iter()
            .enumerate()
            .map(|(j, image)| format!("  {}. {}", j + 1, image.url)),
    );
    block.extend([String::new(), "=".repeat(30), String::new()]);
    block
}
