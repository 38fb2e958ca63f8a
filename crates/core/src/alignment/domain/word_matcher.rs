use serde::{Deserialize, Serialize};

use super::text_normalizer::char_prefix;
use crate::shared::constants::DEFAULT_PREFIX_CHARS;

/// Decides whether a transcript word corresponds to a word of the subtitle script.
///
/// Transcript and script are authored independently, so implementations trade
/// precision for coverage. All arguments except `raw_word` are normalized text.
pub trait WordMatcher: Send + Sync {
    /// Used when searching for the first word of a segment.
    fn is_match(&self, word: &str, target: &str) -> bool;

    /// Second, looser pass for the first word, run on the raw transcript text
    /// only after `is_match` found nothing.
    fn is_prefix_match(&self, raw_word: &str, target: &str) -> bool;

    /// Used when scanning backward for the last word of a segment.
    fn is_end_match(&self, word: &str, target: &str) -> bool;
}

/// Which [`WordMatcher`] to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Substring in either direction, or equal leading characters.
    Prefix,
    /// Substring in either direction only.
    Substring,
}

impl MatchStrategy {
    pub const ALL: &[MatchStrategy] = &[MatchStrategy::Prefix, MatchStrategy::Substring];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "prefix" => Some(MatchStrategy::Prefix),
            "substring" => Some(MatchStrategy::Substring),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::Prefix => write!(f, "prefix"),
            MatchStrategy::Substring => write!(f, "substring"),
        }
    }
}

pub fn create_matcher(strategy: MatchStrategy, prefix_chars: usize) -> Box<dyn WordMatcher> {
    match strategy {
        MatchStrategy::Prefix => Box::new(PrefixWordMatcher::new(prefix_chars)),
        MatchStrategy::Substring => Box::new(SubstringWordMatcher),
    }
}

fn contains_either(word: &str, target: &str) -> bool {
    // An empty word (pure punctuation) would be a substring of everything.
    !word.is_empty() && (word.contains(target) || target.contains(word))
}

/// Default matcher, tuned for scripts where particles attach to word stems
/// and the transcriber splits words differently from the script.
#[derive(Debug, Clone)]
pub struct PrefixWordMatcher {
    prefix_chars: usize,
}

impl PrefixWordMatcher {
    pub fn new(prefix_chars: usize) -> Self {
        Self {
            prefix_chars: prefix_chars.max(1),
        }
    }

    pub fn prefix_chars(&self) -> usize {
        self.prefix_chars
    }
}

impl Default for PrefixWordMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_CHARS)
    }
}

impl WordMatcher for PrefixWordMatcher {
    fn is_match(&self, word: &str, target: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        contains_either(word, target)
            || char_prefix(word, self.prefix_chars) == char_prefix(target, self.prefix_chars)
    }

    fn is_prefix_match(&self, raw_word: &str, target: &str) -> bool {
        let n = self.prefix_chars;
        raw_word.chars().count() >= n
            && target.chars().count() >= n
            && char_prefix(raw_word, n) == char_prefix(target, n)
    }

    fn is_end_match(&self, word: &str, target: &str) -> bool {
        contains_either(word, target)
    }
}

/// Matcher without prefix heuristics, for scripts where short prefixes carry
/// no meaning.
#[derive(Debug, Clone, Default)]
pub struct SubstringWordMatcher;

impl WordMatcher for SubstringWordMatcher {
    fn is_match(&self, word: &str, target: &str) -> bool {
        contains_either(word, target)
    }

    fn is_prefix_match(&self, _raw_word: &str, _target: &str) -> bool {
        false
    }

    fn is_end_match(&self, word: &str, target: &str) -> bool {
        contains_either(word, target)
    }
}
