use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::ProcessingResult;

/// Completion counter shared by the worker threads of one batch
pub struct BatchProcessor {
    total_files: usize,
    completed: AtomicUsize,
    started: Instant,
}

impl BatchProcessor {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            completed: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Record one finished file and return how many are done
    pub fn increment(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Fraction of the batch done, 1.0 for an empty batch
    pub fn progress(&self) -> f64 {
        match self.total_files {
            0 => 1.0,
            total => self.completed.load(Ordering::Relaxed) as f64 / total as f64,
        }
    }

    /// Files finished per second since the batch started
    pub fn items_per_second(&self) -> f64 {
        let done = self.completed.load(Ordering::Relaxed);
        let elapsed = self.started.elapsed().as_secs_f64();
        if done == 0 || elapsed == 0.0 {
            0.0
        } else {
            done as f64 / elapsed
        }
    }
}

/// Final statistics for a run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub with_faces: usize,
    pub center_cropped: usize,
    pub total_faces: usize,
    pub total_duration: Duration,
}

impl ProcessingStats {
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.successful as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn average_duration(&self) -> Duration {
        if self.total_files == 0 {
            Duration::new(0, 0)
        } else {
            self.total_duration / self.total_files as u32
        }
    }
}

/// Fold per-file results into run statistics
pub fn calculate_final_stats(
    results: &[anyhow::Result<ProcessingResult>],
    processing_time: Duration,
) -> ProcessingStats {
    let mut stats = ProcessingStats {
        total_files: results.len(),
        successful: 0,
        failed: 0,
        skipped: 0,
        with_faces: 0,
        center_cropped: 0,
        total_faces: 0,
        total_duration: processing_time,
    };

    for result in results {
        match result {
            Ok(processed) => match processed.decision() {
                None => stats.skipped += 1,
                Some(decision) => {
                    stats.successful += 1;
                    if decision.is_center_crop() {
                        stats.center_cropped += 1;
                    } else {
                        stats.with_faces += 1;
                        stats.total_faces += decision.face_count();
                    }
                }
            },
            Err(_) => stats.failed += 1,
        }
    }

    stats
}
