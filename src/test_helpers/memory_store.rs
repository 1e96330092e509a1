//! In-memory [`Storage`] implementation with the same observable semantics
//! as the Postgres store, including the atomic upsert-and-mark write.

use crate::error::{FailcastError, Result};
use crate::models::{Machine, NewPrediction, NewSensorReading, Prediction, SensorReading};
use crate::pagination::{paginate, CursorPage, PageRequest};
use crate::storage::{PredictionFilter, ReadingFilter, Storage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    machines: HashMap<Uuid, Machine>,
    readings: HashMap<Uuid, SensorReading>,
    /// Keyed by reading id, mirroring the unique constraint.
    predictions: HashMap<Uuid, Prediction>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_machine(&self, machine: Machine) {
        self.inner.write().machines.insert(machine.machine_id, machine);
    }

    /// Insert a reading with a caller-controlled capture timestamp, for
    /// pagination and ordering scenarios.
    pub fn add_reading_at(
        &self,
        reading: NewSensorReading,
        recorded_at: DateTime<Utc>,
    ) -> SensorReading {
        let stored = SensorReading {
            reading_id: Uuid::new_v4(),
            machine_id: reading.machine_id,
            air_temperature_k: reading.air_temperature_k,
            process_temperature_k: reading.process_temperature_k,
            rotational_speed_rpm: reading.rotational_speed_rpm,
            torque_nm: reading.torque_nm,
            tool_wear_min: reading.tool_wear_min,
            is_processed: false,
            processed_at: None,
            recorded_at,
        };
        self.inner
            .write()
            .readings
            .insert(stored.reading_id, stored.clone());
        stored
    }

    /// Make every subsequent write fail with a persistence error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn reading(&self, reading_id: Uuid) -> Option<SensorReading> {
        self.inner.read().readings.get(&reading_id).cloned()
    }

    pub fn prediction_count(&self) -> usize {
        self.inner.read().predictions.len()
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FailcastError::Persistence(
                "simulated storage write failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for InMemoryStore {
    async fn machine(&self, machine_id: Uuid) -> Result<Option<Machine>> {
        Ok(self.inner.read().machines.get(&machine_id).cloned())
    }

    async fn active_machines(&self) -> Result<Vec<Machine>> {
        let mut machines: Vec<Machine> = self
            .inner
            .read()
            .machines
            .values()
            .filter(|m| m.is_active())
            .cloned()
            .collect();
        machines.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(machines)
    }

    async fn insert_reading(&self, reading: NewSensorReading) -> Result<SensorReading> {
        self.check_writes()?;
        Ok(self.add_reading_at(reading, Utc::now()))
    }

    async fn unprocessed_readings(&self) -> Result<Vec<SensorReading>> {
        let mut readings: Vec<SensorReading> = self
            .inner
            .read()
            .readings
            .values()
            .filter(|r| !r.is_processed)
            .cloned()
            .collect();
        readings.sort_by_key(|r| r.recorded_at);
        Ok(readings)
    }

    async fn readings_page(
        &self,
        filter: ReadingFilter,
        page: PageRequest,
    ) -> Result<CursorPage<SensorReading>> {
        let limit = page.effective_limit();
        let mut rows: Vec<SensorReading> = self
            .inner
            .read()
            .readings
            .values()
            .filter(|r| filter.machine_id.map_or(true, |id| r.machine_id == id))
            .filter(|r| !filter.unprocessed_only || !r.is_processed)
            .filter(|r| page.cursor.map_or(true, |cursor| r.recorded_at < cursor))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        rows.truncate(limit + 1);

        Ok(paginate(rows, limit, |r| r.recorded_at))
    }

    async fn record_prediction(&self, prediction: NewPrediction) -> Result<Prediction> {
        self.check_writes()?;

        let mut inner = self.inner.write();

        // Upsert keyed on reading id: a second write for the same reading
        // overwrites the verdict but keeps identity and creation time.
        let stored = match inner.predictions.get(&prediction.reading_id) {
            Some(existing) => Prediction {
                prediction_id: existing.prediction_id,
                created_at: existing.created_at,
                reading_id: prediction.reading_id,
                machine_id: prediction.machine_id,
                is_failure: prediction.is_failure,
                failure_type: prediction.failure_type,
                confidence_score: prediction.confidence_score,
                explanation_data: prediction.explanation_data,
                natural_language_reason: prediction.natural_language_reason,
            },
            None => Prediction {
                prediction_id: Uuid::new_v4(),
                reading_id: prediction.reading_id,
                machine_id: prediction.machine_id,
                is_failure: prediction.is_failure,
                failure_type: prediction.failure_type,
                confidence_score: prediction.confidence_score,
                explanation_data: prediction.explanation_data,
                natural_language_reason: prediction.natural_language_reason,
                created_at: Utc::now(),
            },
        };
        inner
            .predictions
            .insert(stored.reading_id, stored.clone());

        if let Some(reading) = inner.readings.get_mut(&stored.reading_id) {
            reading.is_processed = true;
            reading.processed_at = Some(Utc::now());
        }

        Ok(stored)
    }

    async fn prediction_for_reading(&self, reading_id: Uuid) -> Result<Option<Prediction>> {
        Ok(self.inner.read().predictions.get(&reading_id).cloned())
    }

    async fn predictions_page(
        &self,
        filter: PredictionFilter,
        page: PageRequest,
    ) -> Result<CursorPage<Prediction>> {
        let limit = page.effective_limit();
        let mut rows: Vec<Prediction> = self
            .inner
            .read()
            .predictions
            .values()
            .filter(|p| filter.machine_id.map_or(true, |id| p.machine_id == id))
            .filter(|p| !filter.failures_only || p.is_failure)
            .filter(|p| page.cursor.map_or(true, |cursor| p.created_at < cursor))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit + 1);

        Ok(paginate(rows, limit, |p| p.created_at))
    }
}
