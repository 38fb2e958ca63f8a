use crate::alignment::domain::alignment_engine::AlignmentEngine;
use crate::pipeline::section_executor::SectionExecutor;
use crate::pipeline::section_job::{time_section, SectionJob, SectionReport, TimingMode};

const DEFAULT_WORKERS: usize = 4;

/// Times sections on a pool of worker threads.
///
/// Layout: `jobs queue → N workers → reports queue`
///
/// Sections share no mutable state (each run owns its cursor), so workers only
/// share a reference to the engine. Reports are put back into job order.
pub struct ThreadedSectionExecutor {
    workers: usize,
}

impl ThreadedSectionExecutor {
    pub fn new() -> Self {
        Self::with_workers(DEFAULT_WORKERS)
    }

    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedSectionExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExecutor for ThreadedSectionExecutor {
    fn execute(
        &self,
        engine: &AlignmentEngine,
        mode: TimingMode,
        jobs: Vec<SectionJob>,
    ) -> Vec<SectionReport> {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, SectionJob)>();
        let (report_tx, report_rx) = crossbeam_channel::unbounded::<(usize, SectionReport)>();

        for job in jobs.into_iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        let workers = self.workers.min(total);
        log::debug!("Timing {total} sections on {workers} workers");

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let report_tx = report_tx.clone();
                scope.spawn(move || {
                    for (idx, job) in job_rx {
                        let report = time_section(engine, mode, &job);
                        if report_tx.send((idx, report)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(report_tx);

        let mut indexed: Vec<(usize, SectionReport)> = report_rx.into_iter().collect();
        indexed.sort_by_key(|(idx, _)| *idx);
        indexed.into_iter().map(|(_, report)| report).collect()
    }
}
