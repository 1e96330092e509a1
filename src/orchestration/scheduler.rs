//! # Scheduler
//!
//! Interval loops that drive the pipeline: batch processing, synthetic data
//! generation, and rate-limiter key sweeps. Each loop runs its body
//! immediately on start, then on every tick, and never lets a tick failure
//! kill the loop. Overlapping batch ticks degrade to skipped ticks through
//! the coordinator's single-flight guard.
//!
//! All loops are spawned by the composition root and live for the process.

use crate::orchestration::batch_coordinator::BatchCoordinator;
use crate::orchestration::data_generator::SyntheticDataGenerator;
use crate::orchestration::types::BatchRunOutcome;
use crate::resilience::RateLimiter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Trigger the batch coordinator every `interval`, first run immediate.
pub fn spawn_batch_processor(
    coordinator: Arc<BatchCoordinator>,
    interval: Duration,
) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting batch processor loop");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match coordinator.run().await {
                Ok(BatchRunOutcome::Completed(report)) if report.total > 0 => {
                    info!(
                        total = report.total,
                        successful = report.successful,
                        failed = report.failed,
                        "Scheduled batch run finished"
                    );
                }
                Ok(BatchRunOutcome::Completed(_)) => {
                    debug!("Scheduled batch run had nothing to do");
                }
                Ok(BatchRunOutcome::AlreadyRunning) => {
                    debug!("Previous batch run still in flight; tick skipped");
                }
                Err(err) => {
                    error!(%err, "Scheduled batch run failed");
                }
            }
        }
    })
}

/// Generate synthetic readings every `interval`, first run immediate.
pub fn spawn_data_generator(
    generator: Arc<SyntheticDataGenerator>,
    interval: Duration,
) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting data generator loop");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match generator.generate_for_all_machines().await {
                Ok(report) => {
                    debug!(
                        total = report.total,
                        successful = report.successful,
                        failed = report.failed,
                        "Scheduled generation finished"
                    );
                }
                Err(err) => {
                    error!(%err, "Scheduled generation failed");
                }
            }
        }
    })
}

/// Sweep idle keys out of the given limiters every `interval`, bounding
/// their memory.
pub fn spawn_limiter_cleanup(
    limiters: Vec<Arc<RateLimiter>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately; sweeping empty limiters is harmless.
        loop {
            ticker.tick().await;
            for limiter in &limiters {
                limiter.cleanup();
            }
        }
    })
}
