use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use caption_align_core::alignment::domain::alignment_engine::AlignmentEngine;
use caption_align_core::alignment::domain::alignment_params::AlignmentParams;
use caption_align_core::alignment::domain::word_matcher::{create_matcher, MatchStrategy};
use caption_align_core::pipeline::section_job::TimingMode;
use caption_align_core::shared::constants::DEFAULT_PREFIX_CHARS;

/// Persistent defaults for the CLI. Every field can be overridden by a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub alignment: AlignmentParams,
    pub matcher: MatchStrategy,
    pub prefix_chars: usize,
    pub mode: TimingMode,
    /// 1 times sections sequentially; more spreads them across threads.
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alignment: AlignmentParams::default(),
            matcher: MatchStrategy::Prefix,
            prefix_chars: DEFAULT_PREFIX_CHARS,
            mode: TimingMode::Aligned,
            workers: 1,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("caption-align").join("settings.json"))
    }

    /// Loads settings from `explicit`, or from the per-user config file.
    ///
    /// An explicit path must exist. A missing per-user file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let json = fs::read_to_string(&path)
            .map_err(|e| format!("Cannot read settings {}: {e}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .map_err(|e| format!("Invalid settings {}: {e}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let p = &self.alignment;
        if !p.secs_per_char.is_finite() || p.secs_per_char <= 0.0 {
            return Err(format!(
                "Seconds per character must be positive, got {}",
                p.secs_per_char
            )
            .into());
        }
        if !p.gap_secs.is_finite() || p.gap_secs < 0.0 {
            return Err(format!("Gap must not be negative, got {}", p.gap_secs).into());
        }
        if self.prefix_chars == 0 {
            return Err("Prefix characters must be at least 1".into());
        }
        if self.workers == 0 {
            return Err("Workers must be at least 1".into());
        }
        Ok(())
    }

    pub fn build_engine(&self) -> AlignmentEngine {
        AlignmentEngine::new(
            self.alignment,
            create_matcher(self.matcher, self.prefix_chars),
        )
    }
}
