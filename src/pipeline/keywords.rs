//! Keyword extraction: a naive search query per scene.
//!
//! The query is the first three lower-cased words that are longer than two
//! characters and not common function words. No stemming, no ranking.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Maximum number of tokens in a keyword string.
pub const MAX_KEYWORDS: usize = 3;

/// Tokens must be strictly longer than this many characters.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Function words never used as search terms.
pub const STOP_WORDS: [&str; 31] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "was", "are", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should",
];

static STOP_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.into_iter().collect());

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Whether `word` (already lower-cased) is in the stop-word set.
pub fn is_stop_word(word: &str) -> bool {
    STOP_SET.contains(word)
}

/// Derive a space-joined query of at most [`MAX_KEYWORDS`] tokens.
///
/// Returns an empty string when no token survives filtering.
pub fn extract_keywords(text: &str) -> String {
    let lowered = text.to_lowercase();
    RE_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !is_stop_word(w) && w.chars().count() > MIN_TOKEN_CHARS)
        .take(MAX_KEYWORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_three_content_words() {
        assert_eq!(
            extract_keywords("The brave astronaut found a glowing crystal"),
            "brave astronaut found"
        );
        assert_eq!(
            extract_keywords("It pulsed softly in the dark cave"),
            "pulsed softly dark"
        );
    }

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            extract_keywords("Captain ELENA, gazed—through the viewport"),
            "captain elena gazed"
        );
    }

    #[test]
    fn fewer_than_three_survivors() {
        assert_eq!(extract_keywords("It was on the ship"), "ship");
    }

    #[test]
    fn nothing_survives() {
        assert_eq!(extract_keywords("It is to be or not"), "not");
        assert_eq!(extract_keywords("He is in it, as we do"), "");
        assert_eq!(extract_keywords(""), "");
    }

    #[test]
    fn should_is_a_stop_word() {
        assert!(is_stop_word("should"));
        assert_eq!(extract_keywords("You should have known better"), "you known better");
    }

    #[test]
    fn stop_set_has_thirty_one_words() {
        assert_eq!(STOP_SET.len(), 31);
    }

    #[test]
    fn output_respects_all_token_rules() {
        let samples = [
            "Detective Sarah Chen stood in the abandoned mansion's grand foyer",
            "A grandfather clock chimed midnight as she climbed the creaking stairs",
            "Oh! Ah? Eh... ok",
            "The book's pages shimmered with golden runes",
        ];
        for s in samples {
            let kw = extract_keywords(s);
            let tokens: Vec<&str> = kw.split_whitespace().collect();
            assert!(tokens.len() <= MAX_KEYWORDS, "{kw}");
            for t in tokens {
                assert!(t.chars().count() > MIN_TOKEN_CHARS, "{t}");
                assert!(!is_stop_word(t), "{t}");
                assert_eq!(t, t.to_lowercase());
            }
        }
    }

    #[test]
    fn deterministic() {
        let s = "Young wizard Alaric discovered an ancient tome";
        assert_eq!(extract_keywords(s), extract_keywords(s));
    }
}
