use crate::shared::constants::SEGMENT_DELIMITER;

/// A scene with the subtitle segments it displays, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub scene_id: String,
    pub section: String,
    pub segments: Vec<String>,
}

/// A section (one narration audio file) and its scenes, in playback order.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionPlan {
    pub name: String,
    pub scene_ids: Vec<String>,
}

/// Splits a `;;`-delimited subtitle string into trimmed, non-blank segments.
pub fn split_subtitle_display(display: &str) -> Vec<String> {
    display
        .split(SEGMENT_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
