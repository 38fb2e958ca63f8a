use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::alignment::domain::transcript::TranscriptWord;
use crate::project::domain::project_source::ProjectSource;
use crate::project::domain::scene::{split_subtitle_display, Scene, SectionPlan};
use crate::shared::constants::{
    AUDIO_DIR, SCENES_INDEX_FILENAME, SCRIPTS_DIR, SECTION_AUDIO_EXTENSION, TRANSCRIPT_SUFFIX,
};
use crate::shared::error::TimingError;

#[derive(Debug, Default, Deserialize)]
struct ScenesIndex {
    #[serde(default)]
    meta: IndexMeta,
    #[serde(default)]
    scenes: Vec<SceneEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct IndexMeta {
    #[serde(default)]
    sections: BTreeMap<String, SectionInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct SectionInfo {
    #[serde(default)]
    scenes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SceneEntry {
    #[serde(default)]
    scene_id: Option<String>,
    #[serde(default)]
    section: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    #[serde(default)]
    subtitle_segments: Vec<String>,
    #[serde(default)]
    subtitle_display: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptFile {
    #[serde(default)]
    words: Vec<TranscriptRecord>,
}

#[derive(Debug, Deserialize)]
struct TranscriptRecord {
    word: String,
    start: f64,
    end: f64,
}

impl TranscriptFile {
    fn into_words(self) -> Vec<TranscriptWord> {
        self.words
            .into_iter()
            .map(|r| TranscriptWord::new(r.word, r.start, r.end))
            .collect()
    }
}

/// Reads a single word-level transcript file outside of any project layout.
pub fn load_transcript(path: &Path) -> Result<Vec<TranscriptWord>, TimingError> {
    let raw = fs::read_to_string(path).map_err(|e| TimingError::read(path, e))?;
    let file: TranscriptFile =
        serde_json::from_str(&raw).map_err(|e| TimingError::json(path, e))?;
    Ok(file.into_words())
}

/// Reads the project layout written by the script and audio stages:
///
/// - `<scripts>/scenes.json`: section plan
/// - `<scripts>/<scene_id>.json`: `subtitle_segments` or `;;`-joined `subtitle_display`
/// - `<audio>/<section>_whisper.json`: `{ "words": [{ "word", "start", "end" }] }`
pub struct JsonProjectSource {
    scripts_dir: PathBuf,
    audio_dir: PathBuf,
}

impl JsonProjectSource {
    /// Uses the default `output/1_scripts` and `output/2_audio` under `root`.
    pub fn new(root: &Path) -> Self {
        Self::with_dirs(&root.join(SCRIPTS_DIR), &root.join(AUDIO_DIR))
    }

    pub fn with_dirs(scripts_dir: &Path, audio_dir: &Path) -> Self {
        Self {
            scripts_dir: scripts_dir.to_path_buf(),
            audio_dir: audio_dir.to_path_buf(),
        }
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    fn transcript_path(&self, section: &str) -> PathBuf {
        self.audio_dir.join(format!("{section}{TRANSCRIPT_SUFFIX}"))
    }
}

impl ProjectSource for JsonProjectSource {
    fn sections(&self) -> Result<Vec<SectionPlan>, TimingError> {
        let path = self.scripts_dir.join(SCENES_INDEX_FILENAME);
        let index: ScenesIndex =
            read_json(&path)?.ok_or_else(|| TimingError::MissingIndex(path.clone()))?;
        Ok(plan_sections(index))
    }

    fn transcript(&self, section: &str) -> Result<Option<Vec<TranscriptWord>>, TimingError> {
        let file: Option<TranscriptFile> = read_json(&self.transcript_path(section))?;
        Ok(file.map(TranscriptFile::into_words))
    }

    fn scene(&self, scene_id: &str, section: &str) -> Result<Option<Scene>, TimingError> {
        let path = self.scripts_dir.join(format!("{scene_id}.json"));
        let file: Option<SceneFile> = read_json(&path)?;
        Ok(file.map(|f| {
            let segments = if !f.subtitle_segments.is_empty() {
                f.subtitle_segments
            } else {
                f.subtitle_display
                    .as_deref()
                    .map(split_subtitle_display)
                    .unwrap_or_default()
            };
            Scene {
                scene_id: scene_id.to_string(),
                section: section.to_string(),
                segments,
            }
        }))
    }

    fn section_audio(&self, section: &str) -> String {
        self.audio_dir
            .join(format!("{section}.{SECTION_AUDIO_EXTENSION}"))
            .to_string_lossy()
            .into_owned()
    }
}

/// Section order follows first appearance in the `scenes` list; sections only
/// listed under `meta.sections` come after, by name.
fn plan_sections(index: ScenesIndex) -> Vec<SectionPlan> {
    let mut order: Vec<String> = Vec::new();
    for section in index.scenes.iter().filter_map(|s| s.section.as_ref()) {
        if !order.contains(section) {
            order.push(section.clone());
        }
    }
    for name in index.meta.sections.keys() {
        if !order.contains(name) {
            order.push(name.clone());
        }
    }

    order
        .into_iter()
        .map(|name| {
            let scene_ids = match index.meta.sections.get(&name) {
                Some(info) => info.scenes.clone(),
                None => index
                    .scenes
                    .iter()
                    .filter(|s| s.section.as_deref() == Some(name.as_str()))
                    .filter_map(|s| s.scene_id.clone())
                    .collect(),
            };
            SectionPlan { name, scene_ids }
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, TimingError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| TimingError::read(path, e))?;
    let value = serde_json::from_str(&raw).map_err(|e| TimingError::json(path, e))?;
    Ok(Some(value))
}
