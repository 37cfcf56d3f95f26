//! Segmentation: cut raw prose into sentence-sized scenes.
//!
//! Sentences end at any run of `.`, `!` or `?`. Fragments of ten characters
//! or fewer (stray initials, "Yes!", ellipsis debris) are dropped because
//! they carry too little content to illustrate.

use crate::output::Scene;
use crate::pipeline::keywords::extract_keywords;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Fragments must be strictly longer than this many characters.
pub const MIN_SCENE_CHARS: usize = 10;

static RE_TERMINATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Split `text` into trimmed sentence fragments, keeping only those longer
/// than [`MIN_SCENE_CHARS`], in their original order.
pub fn split_sentences(text: &str) -> Vec<String> {
    RE_TERMINATORS
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SCENE_CHARS)
        .map(str::to_string)
        .collect()
}

/// Turn `text` into scenes, each carrying its keyword query.
///
/// An empty result means there is nothing to process.
pub fn process_text(text: &str) -> Vec<Scene> {
    let scenes: Vec<Scene> = split_sentences(text)
        .into_iter()
        .map(|sentence| {
            let keywords = extract_keywords(&sentence);
            Scene {
                text: sentence,
                keywords,
            }
        })
        .collect();
    debug!("Segmented {} chars into {} scenes", text.len(), scenes.len());
    scenes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_terminator_kind() {
        let parts = split_sentences("The storm rolled in fast! Did anyone see it coming? Nobody was ready.");
        assert_eq!(
            parts,
            vec![
                "The storm rolled in fast",
                "Did anyone see it coming",
                "Nobody was ready",
            ]
        );
    }

    #[test]
    fn runs_of_terminators_count_once() {
        let parts = split_sentences("Wait for it... the curtain finally rose?!");
        assert_eq!(parts, vec!["Wait for it", "the curtain finally rose"]);
    }

    #[test]
    fn drops_short_fragments() {
        // "Yes" and "Go now" are too short; exactly ten chars is too short too.
        let parts = split_sentences("Yes. Go now. abcdefghij. The dragon slept on its gold.");
        assert_eq!(parts, vec!["The dragon slept on its gold"]);
    }

    #[test]
    fn eleven_chars_survive() {
        assert_eq!(split_sentences("abcdefghijk."), vec!["abcdefghijk"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Ten accented characters are twenty bytes but still too short.
        assert!(split_sentences("éééééééééé.").is_empty());
    }

    #[test]
    fn text_without_terminators_is_one_fragment() {
        let parts = split_sentences("  a long line with no full stop at the end  ");
        assert_eq!(parts, vec!["a long line with no full stop at the end"]);
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\t ").is_empty());
        assert!(split_sentences("Hi. Ok! No?").is_empty());
    }

    #[test]
    fn preserves_input_order() {
        let text = "First comes the long morning. Then comes the long noon. Last comes the long night.";
        let parts = split_sentences(text);
        let mut cursor = 0;
        for p in &parts {
            let pos = text[cursor..].find(p.as_str()).expect("fragment present") + cursor;
            assert!(pos >= cursor);
            cursor = pos + p.len();
        }
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn process_text_attaches_keywords() {
        let scenes = process_text("The brave astronaut found a glowing crystal.");
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].text, "The brave astronaut found a glowing crystal");
        assert_eq!(scenes[0].keywords, "brave astronaut found");
    }
}
