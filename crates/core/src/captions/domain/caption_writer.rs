use super::scene_timing::SceneTiming;
use crate::shared::error::TimingError;

/// Persists the timing of one scene (caption file plus timing report).
pub trait CaptionWriter: Send {
    fn write(&self, timing: &SceneTiming) -> Result<(), TimingError>;
}
