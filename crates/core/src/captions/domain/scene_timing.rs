use serde::{Deserialize, Serialize};

use crate::alignment::domain::alignment_result::{
    round2, AlignmentResult, Confidence, SectionSummary,
};
use crate::shared::constants::EMPTY_SCENE_DURATION;

/// Timing report for one scene, persisted next to its SRT file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTiming {
    pub scene_id: String,
    pub section: String,
    pub timing: SceneSpan,
    pub captions: Vec<Caption>,
    pub match_info: MatchInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpan {
    /// Audio file the times are relative to.
    pub section_audio: String,
    pub scene_start: f64,
    pub scene_end: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub index: usize,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    #[serde(default)]
    pub matched_word_indices: Vec<usize>,
    #[serde(default)]
    pub words_matched: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub total_segments: usize,
    pub matched_segments: usize,
    /// Whole percentage, e.g. `"75%"`.
    pub match_rate: String,
    pub confidence: Confidence,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<&AlignmentResult> for Caption {
    fn from(r: &AlignmentResult) -> Self {
        Self {
            index: r.index,
            text: r.text.clone(),
            start: r.start,
            end: r.end,
            duration: r.duration,
            matched_word_indices: r.matched_word_indices.clone(),
            words_matched: r.matched_words.clone(),
            fallback: r.is_fallback,
        }
    }
}

impl From<&SectionSummary> for MatchInfo {
    fn from(s: &SectionSummary) -> Self {
        Self {
            total_segments: s.total_segments,
            matched_segments: s.matched_segments,
            match_rate: s.match_rate_label(),
            confidence: s.confidence,
        }
    }
}

impl SceneTiming {
    /// Builds the report for a scene from its alignment results.
    ///
    /// The scene spans from its first caption's start to its last caption's
    /// end. A scene without captions gets a fixed placeholder duration.
    pub fn build(
        scene_id: &str,
        section: &str,
        section_audio: &str,
        results: &[AlignmentResult],
    ) -> Self {
        let scene_start = results.first().map(|r| r.start).unwrap_or(0.0);
        let scene_end = results
            .last()
            .map(|r| r.end)
            .unwrap_or(scene_start + EMPTY_SCENE_DURATION);

        Self {
            scene_id: scene_id.to_string(),
            section: section.to_string(),
            timing: SceneSpan {
                section_audio: section_audio.to_string(),
                scene_start: round2(scene_start),
                scene_end: round2(scene_end),
                duration: round2(scene_end - scene_start),
            },
            captions: results.iter().map(Caption::from).collect(),
            match_info: MatchInfo::from(&SectionSummary::from_results(results)),
        }
    }

    /// Rebuilds alignment results from the persisted captions.
    pub fn results(&self) -> Vec<AlignmentResult> {
        self.captions
            .iter()
            .map(|c| AlignmentResult {
                index: c.index,
                text: c.text.clone(),
                start: c.start,
                end: c.end,
                duration: c.duration,
                matched_word_indices: c.matched_word_indices.clone(),
                matched_words: c.words_matched.clone(),
                is_fallback: c.fallback,
            })
            .collect()
    }
}
