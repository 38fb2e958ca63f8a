use crate::alignment::domain::alignment_engine::AlignmentEngine;
use crate::pipeline::section_job::{time_section, SectionJob, SectionReport, TimingMode};

/// Abstracts how independent sections are timed (in sequence or in parallel).
///
/// Implementations must return one report per job, in job order.
pub trait SectionExecutor: Send {
    fn execute(
        &self,
        engine: &AlignmentEngine,
        mode: TimingMode,
        jobs: Vec<SectionJob>,
    ) -> Vec<SectionReport>;
}

/// Times sections one after another on the calling thread.
pub struct SequentialSectionExecutor;

impl SectionExecutor for SequentialSectionExecutor {
    fn execute(
        &self,
        engine: &AlignmentEngine,
        mode: TimingMode,
        jobs: Vec<SectionJob>,
    ) -> Vec<SectionReport> {
        jobs.iter()
            .map(|job| time_section(engine, mode, job))
            .collect()
    }
}
