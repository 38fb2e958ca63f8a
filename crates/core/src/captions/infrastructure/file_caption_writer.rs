use std::fs;
use std::path::{Path, PathBuf};

use crate::captions::domain::caption_writer::CaptionWriter;
use crate::captions::domain::scene_timing::SceneTiming;
use crate::captions::domain::srt::render_srt;
use crate::shared::constants::TIMED_SUFFIX;
use crate::shared::error::TimingError;

/// Writes `<scene_id>_timed.json` and `<scene_id>.srt` into a directory.
pub struct FileCaptionWriter {
    output_dir: PathBuf,
}

impl FileCaptionWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn timing_path(&self, scene_id: &str) -> PathBuf {
        self.output_dir.join(format!("{scene_id}{TIMED_SUFFIX}"))
    }

    pub fn srt_path(&self, scene_id: &str) -> PathBuf {
        self.output_dir.join(format!("{scene_id}.srt"))
    }
}

impl CaptionWriter for FileCaptionWriter {
    fn write(&self, timing: &SceneTiming) -> Result<(), TimingError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| TimingError::write(&self.output_dir, e))?;

        let json = serde_json::to_string_pretty(timing).map_err(|source| {
            TimingError::Serialize {
                scene_id: timing.scene_id.clone(),
                source,
            }
        })?;
        let timing_path = self.timing_path(&timing.scene_id);
        fs::write(&timing_path, json).map_err(|e| TimingError::write(&timing_path, e))?;

        let srt_path = self.srt_path(&timing.scene_id);
        fs::write(&srt_path, render_srt(&timing.results()))
            .map_err(|e| TimingError::write(&srt_path, e))?;

        log::debug!(
            "Wrote {} and {}",
            timing_path.display(),
            srt_path.display()
        );
        Ok(())
    }
}
