use std::collections::HashSet;

use crate::alignment::domain::alignment_engine::AlignmentEngine;
use crate::captions::domain::caption_writer::CaptionWriter;
use crate::pipeline::section_executor::SectionExecutor;
use crate::pipeline::section_job::{SectionJob, SectionReport, TimingMode};
use crate::project::domain::project_source::ProjectSource;
use crate::project::domain::scene::SectionPlan;
use crate::shared::error::TimingError;

pub struct TimeScenesUseCase {
    source: Box<dyn ProjectSource>,
    writer: Box<dyn CaptionWriter>,
    engine: AlignmentEngine,
    executor: Box<dyn SectionExecutor>,
    mode: TimingMode,
    section_filter: Option<HashSet<String>>,
}

impl TimeScenesUseCase {
    pub fn new(
        source: Box<dyn ProjectSource>,
        writer: Box<dyn CaptionWriter>,
        engine: AlignmentEngine,
        executor: Box<dyn SectionExecutor>,
        mode: TimingMode,
    ) -> Self {
        Self {
            source,
            writer,
            engine,
            executor,
            mode,
            section_filter: None,
        }
    }

    /// Restricts the run to the named sections. An empty list means all.
    pub fn with_sections(mut self, sections: Vec<String>) -> Self {
        self.section_filter = if sections.is_empty() {
            None
        } else {
            Some(sections.into_iter().collect())
        };
        self
    }

    pub fn run(&self) -> Result<Vec<SectionReport>, TimingError> {
        // 1. Plan
        let plans = self.filter_plans(self.source.sections()?);

        // 2. Load every input before timing anything
        let mut jobs = Vec::with_capacity(plans.len());
        for plan in &plans {
            if let Some(job) = self.load_job(plan)? {
                jobs.push(job);
            }
        }

        // 3. Time
        log::info!("Timing {} sections ({} mode)", jobs.len(), self.mode);
        let reports = self.executor.execute(&self.engine, self.mode, jobs);

        // 4. Write
        for report in &reports {
            for timing in &report.scenes {
                self.writer.write(timing)?;
            }
            log::info!(
                "[{}] {}/{} segments matched ({}, {})",
                report.section,
                report.summary.matched_segments,
                report.summary.total_segments,
                report.summary.match_rate_label(),
                report.summary.confidence
            );
        }

        Ok(reports)
    }

    fn filter_plans(&self, plans: Vec<SectionPlan>) -> Vec<SectionPlan> {
        let Some(filter) = &self.section_filter else {
            return plans;
        };

        let known: HashSet<&str> = plans.iter().map(|p| p.name.as_str()).collect();
        let mut unknown: Vec<&String> = filter
            .iter()
            .filter(|name| !known.contains(name.as_str()))
            .collect();
        unknown.sort();
        for name in unknown {
            log::warn!("Unknown section '{name}', ignoring");
        }

        plans
            .into_iter()
            .filter(|p| filter.contains(&p.name))
            .collect()
    }

    fn load_job(&self, plan: &SectionPlan) -> Result<Option<SectionJob>, TimingError> {
        let transcript = match self.source.transcript(&plan.name)? {
            Some(words) if !words.is_empty() => words,
            Some(_) => {
                log::warn!("[{}] transcript has no words, skipping section", plan.name);
                return Ok(None);
            }
            None => {
                log::warn!("[{}] no transcript found, skipping section", plan.name);
                return Ok(None);
            }
        };

        let mut scenes = Vec::with_capacity(plan.scene_ids.len());
        for scene_id in &plan.scene_ids {
            match self.source.scene(scene_id, &plan.name)? {
                Some(scene) if !scene.segments.is_empty() => scenes.push(scene),
                Some(_) => log::warn!("{scene_id}: no subtitle segments, skipping"),
                None => log::warn!("{scene_id}: scene file not found, skipping"),
            }
        }

        if scenes.is_empty() {
            log::warn!("[{}] no scenes to time, skipping section", plan.name);
            return Ok(None);
        }

        Ok(Some(SectionJob {
            section: plan.name.clone(),
            section_audio: self.source.section_audio(&plan.name),
            transcript,
            scenes,
        }))
    }
}
