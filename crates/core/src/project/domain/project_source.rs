use super::scene::{Scene, SectionPlan};
use crate::alignment::domain::transcript::TranscriptWord;
use crate::shared::error::TimingError;

/// Loads the inputs of a timing run: the section plan, per-section
/// transcripts, and per-scene subtitle segments.
///
/// Missing per-section or per-scene files are reported as `Ok(None)` so the
/// pipeline can skip them; malformed files are errors.
pub trait ProjectSource: Send {
    /// Sections in playback order.
    fn sections(&self) -> Result<Vec<SectionPlan>, TimingError>;

    fn transcript(&self, section: &str) -> Result<Option<Vec<TranscriptWord>>, TimingError>;

    fn scene(&self, scene_id: &str, section: &str) -> Result<Option<Scene>, TimingError>;

    /// Audio path recorded in timing reports for this section.
    fn section_audio(&self, section: &str) -> String;
}
