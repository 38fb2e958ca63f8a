use serde::{Deserialize, Serialize};

use crate::shared::constants::{DEFAULT_GAP_SECS, DEFAULT_SEARCH_SLACK, DEFAULT_SECS_PER_CHAR};

/// Tuning knobs for the alignment heuristic.
///
/// The defaults are calibrated for Korean narration; other languages or
/// speaking rates usually need a different `secs_per_char`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParams {
    /// Estimated speaking time per character for fallback segments.
    pub secs_per_char: f64,
    /// Gap placed between a previous caption and a following fallback caption.
    pub gap_secs: f64,
    /// Extra transcript words allowed past the expected segment end.
    pub search_slack: usize,
    /// Let the backward end scan stop on the segment's first word.
    ///
    /// Off by default: the scan stops just above the first word, so a
    /// single-word segment keeps the slack-extended end estimate.
    pub inclusive_end_scan: bool,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            secs_per_char: DEFAULT_SECS_PER_CHAR,
            gap_secs: DEFAULT_GAP_SECS,
            search_slack: DEFAULT_SEARCH_SLACK,
            inclusive_end_scan: false,
        }
    }
}
