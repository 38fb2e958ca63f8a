use super::alignment_result::{round2, AlignmentResult};

/// Spreads a section's spoken duration evenly over its scenes, and each
/// scene's share evenly over its segments.
///
/// Used when transcript evidence is not trusted at all. Every result is marked
/// as a fallback.
#[derive(Debug, Clone)]
pub struct EvenSplitter {
    scene_duration: f64,
    offset: f64,
}

impl EvenSplitter {
    pub fn new(section_duration: f64, scene_count: usize) -> Self {
        let scene_duration = if scene_count == 0 {
            0.0
        } else {
            section_duration.max(0.0) / scene_count as f64
        };
        Self {
            scene_duration,
            offset: 0.0,
        }
    }

    pub fn scene_duration(&self) -> f64 {
        self.scene_duration
    }

    /// Start of the next scene, relative to the section audio.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Times one scene's segments and advances to the next scene slot.
    pub fn split_scene<S: AsRef<str>>(&mut self, segments: &[S]) -> Vec<AlignmentResult> {
        let scene_start = self.offset;
        self.offset += self.scene_duration;

        if segments.is_empty() {
            return Vec::new();
        }
        let segment_duration = self.scene_duration / segments.len() as f64;

        segments
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let start = scene_start + index as f64 * segment_duration;
                let end = scene_start + (index + 1) as f64 * segment_duration;
                AlignmentResult {
                    index,
                    text: text.as_ref().trim().to_string(),
                    start: round2(start),
                    end: round2(end),
                    duration: round2(segment_duration),
                    matched_word_indices: Vec::new(),
                    matched_words: Vec::new(),
                    is_fallback: true,
                }
            })
            .collect()
    }
}
