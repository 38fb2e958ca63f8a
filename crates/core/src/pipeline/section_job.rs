use serde::{Deserialize, Serialize};

use crate::alignment::domain::alignment_engine::AlignmentEngine;
use crate::alignment::domain::alignment_result::{AlignmentResult, SectionSummary};
use crate::alignment::domain::even_split::EvenSplitter;
use crate::alignment::domain::transcript::{spoken_duration, TranscriptWord};
use crate::captions::domain::scene_timing::SceneTiming;
use crate::project::domain::scene::Scene;

/// How caption times are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingMode {
    /// Align segments against transcript words.
    Aligned,
    /// Divide the spoken duration evenly, ignoring word content.
    Even,
}

impl TimingMode {
    pub const ALL: &[TimingMode] = &[TimingMode::Aligned, TimingMode::Even];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "aligned" => Some(TimingMode::Aligned),
            "even" => Some(TimingMode::Even),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingMode::Aligned => write!(f, "aligned"),
            TimingMode::Even => write!(f, "even"),
        }
    }
}

/// Everything needed to time one section, loaded up front so timing itself
/// does no I/O.
#[derive(Debug, Clone)]
pub struct SectionJob {
    pub section: String,
    pub section_audio: String,
    pub transcript: Vec<TranscriptWord>,
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Clone)]
pub struct SectionReport {
    pub section: String,
    pub scenes: Vec<SceneTiming>,
    /// Aggregated over every caption of every scene in the section.
    pub summary: SectionSummary,
}

/// Times every scene of a section.
///
/// In aligned mode a single run spans the whole section, so scenes consume
/// the transcript one after another.
pub fn time_section(engine: &AlignmentEngine, mode: TimingMode, job: &SectionJob) -> SectionReport {
    let per_scene: Vec<Vec<AlignmentResult>> = match mode {
        TimingMode::Aligned => {
            let mut run = engine.start_run(&job.transcript);
            job.scenes
                .iter()
                .map(|scene| run.align_segments(&scene.segments))
                .collect()
        }
        TimingMode::Even => {
            let mut splitter =
                EvenSplitter::new(spoken_duration(&job.transcript), job.scenes.len());
            job.scenes
                .iter()
                .map(|scene| splitter.split_scene(&scene.segments))
                .collect()
        }
    };

    let all_results: Vec<AlignmentResult> = per_scene.iter().flatten().cloned().collect();
    let scenes: Vec<SceneTiming> = job
        .scenes
        .iter()
        .zip(&per_scene)
        .map(|(scene, results)| {
            let timing =
                SceneTiming::build(&scene.scene_id, &job.section, &job.section_audio, results);
            log::info!(
                "{}: {} segments, {:.1}s ({} matched)",
                scene.scene_id,
                results.len(),
                timing.timing.duration,
                timing.match_info.match_rate
            );
            timing
        })
        .collect();

    SectionReport {
        section: job.section.clone(),
        scenes,
        summary: SectionSummary::from_results(&all_results),
    }
}
