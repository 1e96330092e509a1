//! # Storage Seam
//!
//! The pipeline's only view of persistence. [`Storage`] covers machine
//! lookup, reading ingestion and discovery, the transactional
//! prediction-write, and the cursor-paginated read APIs.
//!
//! [`PgStore`] is the production implementation;
//! [`InMemoryStore`](crate::test_helpers::InMemoryStore) honors the same
//! semantics for tests.

pub mod postgres;

use crate::error::Result;
use crate::models::{Machine, NewPrediction, NewSensorReading, Prediction, SensorReading};
use crate::pagination::{CursorPage, PageRequest};
use async_trait::async_trait;
use uuid::Uuid;

pub use postgres::PgStore;

/// Filter for reading listers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadingFilter {
    pub machine_id: Option<Uuid>,
    pub unprocessed_only: bool,
}

impl ReadingFilter {
    pub fn unprocessed() -> Self {
        Self {
            machine_id: None,
            unprocessed_only: true,
        }
    }

    pub fn for_machine(machine_id: Uuid) -> Self {
        Self {
            machine_id: Some(machine_id),
            unprocessed_only: false,
        }
    }
}

/// Filter for prediction listers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionFilter {
    pub machine_id: Option<Uuid>,
    pub failures_only: bool,
}

impl PredictionFilter {
    pub fn failures() -> Self {
        Self {
            machine_id: None,
            failures_only: true,
        }
    }

    pub fn for_machine(machine_id: Uuid) -> Self {
        Self {
            machine_id: Some(machine_id),
            failures_only: false,
        }
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn machine(&self, machine_id: Uuid) -> Result<Option<Machine>>;

    async fn active_machines(&self) -> Result<Vec<Machine>>;

    async fn insert_reading(&self, reading: NewSensorReading) -> Result<SensorReading>;

    /// All readings with `is_processed = false`, oldest first, unbounded.
    /// This is the coordinator's discovery query.
    async fn unprocessed_readings(&self) -> Result<Vec<SensorReading>>;

    /// Cursor-paginated reading lister, newest first.
    async fn readings_page(
        &self,
        filter: ReadingFilter,
        page: PageRequest,
    ) -> Result<CursorPage<SensorReading>>;

    /// Persist a prediction and mark its source reading processed as one
    /// atomic unit. The write is keyed on `reading_id`: recording a second
    /// prediction for the same reading converges to a single row instead of
    /// violating the one-to-one invariant.
    async fn record_prediction(&self, prediction: NewPrediction) -> Result<Prediction>;

    async fn prediction_for_reading(&self, reading_id: Uuid) -> Result<Option<Prediction>>;

    /// Cursor-paginated prediction lister, newest first.
    async fn predictions_page(
        &self,
        filter: PredictionFilter,
        page: PageRequest,
    ) -> Result<CursorPage<Prediction>>;
}
