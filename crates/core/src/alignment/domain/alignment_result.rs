use serde::{Deserialize, Serialize};

/// Timing assigned to one subtitle segment.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignmentResult {
    /// Position of the segment in its input sequence.
    pub index: usize,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    /// Transcript indices consumed by this segment; empty for fallbacks.
    pub matched_word_indices: Vec<usize>,
    /// Literal transcript words at `matched_word_indices`.
    pub matched_words: Vec<String>,
    /// True when the timing is an estimate rather than transcript evidence.
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
        }
    }
}

/// Aggregate match quality for one batch of results.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSummary {
    pub total_segments: usize,
    pub matched_segments: usize,
    /// Matched fraction in `0.0..=1.0`.
    pub match_rate: f64,
    pub confidence: Confidence,
}

impl SectionSummary {
    pub fn from_results(results: &[AlignmentResult]) -> Self {
        let total_segments = results.len();
        let matched_segments = results.iter().filter(|r| !r.is_fallback).count();
        let match_rate = if total_segments == 0 {
            1.0
        } else {
            matched_segments as f64 / total_segments as f64
        };
        let confidence = if matched_segments == total_segments {
            Confidence::High
        } else {
            Confidence::Medium
        };
        Self {
            total_segments,
            matched_segments,
            match_rate,
            confidence,
        }
    }

    /// Match rate as a whole percentage, e.g. `"67%"`.
    pub fn match_rate_label(&self) -> String {
        format!("{:.0}%", self.match_rate * 100.0)
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
