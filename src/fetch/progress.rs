//! Batch progress and outcome reporting

use crate::state::JobState;
use std::time::{Duration, Instant};

/// Running view of a batch, used only for progress lines
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub total: usize,
    pub completed: usize,
    pub started_at: Instant,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            started_at: Instant::now(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Completed jobs per second since the batch started
    pub fn rate(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.completed as f64 / secs
    }

    /// Estimated time to finish at the current rate, if any progress was made
    pub fn eta(&self, elapsed: Duration) -> Option<Duration> {
        let rate = self.rate(elapsed);
        if rate <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(self.remaining() as f64 / rate))
    }

    pub fn log(&self) {
        let elapsed = self.started_at.elapsed();
        let rate = self.rate(elapsed);
        match self.eta(elapsed) {
            Some(eta) => tracing::info!(
                "{} files to process. {:.2} files per second. ETA: {} seconds.",
                self.remaining(),
                rate,
                eta.as_secs()
            ),
            None => tracing::info!(
                "{} files to process. No download finished yet.",
                self.remaining()
            ),
        }
    }
}

/// Aggregated outcome of one or more download batches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Counts one job that reached a terminal state
    pub fn record(&mut self, state: JobState) {
        match state {
            JobState::Done => self.done += 1,
            JobState::Skipped => self.skipped += 1,
            JobState::Failed => self.failed += 1,
            JobState::Cancelled => self.cancelled += 1,
            JobState::Pending | JobState::InFlight => {
                tracing::warn!("Recording non-terminal job state {} as failed", state);
                self.failed += 1;
            }
        }
    }

    pub fn finished(&self) -> usize {
        self.done + self.skipped + self.failed + self.cancelled
    }

    /// Returns true once every submitted job has been counted
    pub fn is_complete(&self) -> bool {
        self.finished() == self.total
    }

    pub fn merge(&mut self, other: &BatchReport) {
        self.total += other.total;
        self.done += other.done;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.cancelled += other.cancelled;
    }
}
