//! # Sync Metrics
//!
//! Counters for remote pushes: how many ran, how many were fully successful,
//! how long they took and how many records they moved.

use crate::client::sync::push::PushReport;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub struct SyncMetrics {
    pub total_syncs: u64,
    pub successful_syncs: u64,
    pub failed_syncs: u64,
    /// Pushes skipped because a conflict was pending
    pub suppressed_syncs: u64,
    pub average_sync_duration: Duration,
    pub total_records_written: u64,
    pub last_sync_duration: Option<Duration>,
    last_sync_start: Option<Instant>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sync_start(&mut self) {
        self.last_sync_start = Some(Instant::now());
        self.total_syncs += 1;
    }

    /// Close the push opened by `record_sync_start`
    pub fn record_push(&mut self, report: &PushReport) {
        self.total_records_written += (report.upserted + report.deleted) as u64;
        if !report.is_success() {
            self.last_sync_start = None;
            self.failed_syncs += 1;
            return;
        }

        if let Some(start) = self.last_sync_start.take() {
            let duration = start.elapsed();
            self.last_sync_duration = Some(duration);
            self.successful_syncs += 1;

            // Incremental mean in seconds; stays between the old mean and the new sample
            let average = self.average_sync_duration.as_secs_f64();
            let step = (duration.as_secs_f64() - average) / self.successful_syncs as f64;
            self.average_sync_duration = Duration::from_secs_f64((average + step).max(0.0));
        }
    }

    pub fn record_suppressed(&mut self) {
        self.suppressed_syncs += 1;
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_syncs == 0 {
            0.0
        } else {
            self.successful_syncs as f64 / self.total_syncs as f64
        }
    }
}
