//! # Batch Coordinator
//!
//! The pipeline's main loop: discover unprocessed readings, run them through
//! the classifier in fixed-size concurrent batches, persist predictions, and
//! mark source rows processed.
//!
//! ## Failure semantics
//!
//! - Preflight failure (classifier unreachable, non-2xx, or a model not
//!   loaded) soft-skips the run: the caller gets a zero-valued report, not
//!   an error, because a transient outage should not fail a scheduler tick.
//! - Per-item failures are recorded in the run report and never abort the
//!   batch or the run; siblings in the same batch always complete.
//! - The persist-then-mark pair happens inside one storage transaction
//!   keyed on the reading id, so a reading re-discovered after a crash
//!   converges to exactly one prediction.
//!
//! ## Single-flight
//!
//! Scheduled and manual triggers share one run-state flag. A trigger that
//! arrives while a run is in flight returns
//! [`BatchRunOutcome::AlreadyRunning`] without touching storage or the
//! classifier.

use crate::client::Predictor;
use crate::config::FailcastConfig;
use crate::constants::defaults;
use crate::error::Result;
use crate::models::{NewPrediction, Prediction, SensorReading};
use crate::orchestration::types::{BatchRunOutcome, BatchRunReport, ItemOutcome};
use crate::storage::Storage;
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Coordinator tunables.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Readings processed concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches, throttling load on the classifier.
    pub inter_batch_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::BATCH_SIZE,
            inter_batch_delay: Duration::from_millis(defaults::INTER_BATCH_DELAY_MS),
        }
    }
}

impl BatchConfig {
    pub fn from_config(config: &FailcastConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            inter_batch_delay: config.inter_batch_delay,
        }
    }
}

pub struct BatchCoordinator {
    storage: Arc<dyn Storage>,
    predictor: Arc<Predictor>,
    config: BatchConfig,
    running: AtomicBool,
}

/// Releases the run-state flag on every exit path.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BatchCoordinator {
    pub fn new(storage: Arc<dyn Storage>, predictor: Arc<Predictor>, config: BatchConfig) -> Self {
        Self {
            storage,
            predictor,
            config,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Process every unprocessed reading. Callable from the scheduler or
    /// out-of-band as a manual trigger.
    pub async fn run(&self) -> Result<BatchRunOutcome> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("Batch run already in progress; trigger is a no-op");
            return Ok(BatchRunOutcome::AlreadyRunning);
        }
        let _guard = RunGuard(&self.running);

        match self.predictor.check_health().await {
            Ok(health) if health.all_models_loaded() => {}
            Ok(health) => {
                warn!(
                    binary_model_loaded = health.binary_model_loaded,
                    failure_type_model_loaded = health.failure_type_model_loaded,
                    "Classifier models not loaded; skipping batch run"
                );
                return Ok(BatchRunOutcome::Completed(BatchRunReport::empty()));
            }
            Err(err) => {
                warn!(%err, "Classifier health check failed; skipping batch run");
                return Ok(BatchRunOutcome::Completed(BatchRunReport::empty()));
            }
        }

        let readings = self.storage.unprocessed_readings().await?;
        if readings.is_empty() {
            info!("No unprocessed readings");
            return Ok(BatchRunOutcome::Completed(BatchRunReport::empty()));
        }

        info!(count = readings.len(), "Processing unprocessed readings");

        let batch_count = readings.len().div_ceil(self.config.batch_size);
        let mut results = Vec::with_capacity(readings.len());

        for (index, batch) in readings.chunks(self.config.batch_size).enumerate() {
            let outcomes = join_all(batch.iter().map(|r| self.process_reading(r))).await;
            results.extend(outcomes);

            if index + 1 < batch_count {
                tokio::time::sleep(self.config.inter_batch_delay).await;
            }
        }

        let report = BatchRunReport::from_outcomes(results);
        info!(
            total = report.total,
            successful = report.successful,
            failed = report.failed,
            "Batch run complete"
        );

        Ok(BatchRunOutcome::Completed(report))
    }

    /// Process one reading. Every failure is absorbed into the outcome so a
    /// failing item never tears down its siblings.
    async fn process_reading(&self, reading: &SensorReading) -> ItemOutcome {
        match self.try_process(reading).await {
            Ok(prediction) => {
                info!(
                    reading_id = %reading.reading_id,
                    prediction_id = %prediction.prediction_id,
                    is_failure = prediction.is_failure,
                    "Reading processed"
                );
                ItemOutcome::succeeded(reading.reading_id, prediction.prediction_id)
            }
            Err(err) => {
                error!(reading_id = %reading.reading_id, %err, "Failed to process reading");
                ItemOutcome::failed(reading.reading_id, err.to_string())
            }
        }
    }

    async fn try_process(&self, reading: &SensorReading) -> Result<Prediction> {
        let combined = self.predictor.combined_prediction(reading).await?;

        self.storage
            .record_prediction(NewPrediction {
                reading_id: reading.reading_id,
                machine_id: reading.machine_id,
                is_failure: combined.is_failure,
                failure_type: combined.failure_type,
                confidence_score: combined.confidence_score,
                explanation_data: combined.explanation_data,
                natural_language_reason: combined.natural_language_reason,
            })
            .await
    }
}
