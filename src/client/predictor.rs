//! Two-stage prediction orchestration.

use crate::client::classifier::Classifier;
use crate::client::explanation;
use crate::error::{FailcastError, Result};
use crate::models::{Machine, SensorReading};
use crate::resilience::TtlCache;
use crate::storage::Storage;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// The classifier's full verdict for one reading, ready to persist.
#[derive(Debug, Clone)]
pub struct CombinedPrediction {
    pub is_failure: bool,
    pub failure_type: Option<String>,
    pub confidence_score: f64,
    pub probability: f64,
    pub explanation_data: serde_json::Value,
    pub natural_language_reason: String,
}

/// Orchestrates machine resolution and the two-stage classifier call.
///
/// Machine metadata is resolved through a TTL cache backed by storage;
/// machines rarely change, so repeated lookups during a batch run stay off
/// the database.
pub struct Predictor {
    storage: Arc<dyn Storage>,
    classifier: Arc<dyn Classifier>,
    machine_cache: TtlCache<Uuid, Machine>,
    cache_ttl: Duration,
}

impl Predictor {
    pub fn new(
        storage: Arc<dyn Storage>,
        classifier: Arc<dyn Classifier>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            storage,
            classifier,
            machine_cache: TtlCache::new(),
            cache_ttl,
        }
    }

    /// Classifier health, surfaced for the coordinator's preflight.
    pub async fn check_health(&self) -> Result<crate::client::types::HealthStatus> {
        Ok(self.classifier.health().await?)
    }

    async fn resolve_machine(&self, machine_id: Uuid) -> Result<Machine> {
        if let Some(machine) = self.machine_cache.get(&machine_id) {
            return Ok(machine);
        }

        let machine = self
            .storage
            .machine(machine_id)
            .await?
            .ok_or_else(|| FailcastError::NotFound(format!("Machine not found: {machine_id}")))?;

        self.machine_cache
            .insert(machine_id, machine.clone(), self.cache_ttl);
        Ok(machine)
    }

    /// Resolve the machine, run the binary classifier, and classify the
    /// failure type only when a failure is predicted.
    pub async fn combined_prediction(&self, reading: &SensorReading) -> Result<CombinedPrediction> {
        let machine = self.resolve_machine(reading.machine_id).await?;
        let machine_type = machine.risk_type()?;

        let binary = self
            .classifier
            .predict_binary(reading, machine_type)
            .await?;
        let is_failure = binary.is_failure();

        debug!(
            reading_id = %reading.reading_id,
            machine = %machine.display_name(),
            is_failure,
            probability = binary.probability,
            "Binary prediction received"
        );

        let mut explanation_data = serde_json::json!({
            "binary_prediction": binary,
            "machine_info": {
                "machine_id": machine.machine_id,
                "machine_code": machine.code,
                "machine_name": machine.name,
                "machine_type": machine.machine_type,
            },
        });

        if !is_failure {
            return Ok(CombinedPrediction {
                is_failure: false,
                failure_type: None,
                confidence_score: binary.confidence,
                probability: binary.probability,
                natural_language_reason: explanation::normal_reason(&machine, &binary),
                explanation_data,
            });
        }

        let type_prediction = self.classifier.predict_type(reading, machine_type).await?;
        explanation_data["type_prediction"] = serde_json::to_value(&type_prediction)
            .map_err(|e| FailcastError::ServiceUnavailable(e.to_string()))?;

        Ok(CombinedPrediction {
            is_failure: true,
            failure_type: Some(type_prediction.prediction.clone()),
            confidence_score: type_prediction.confidence,
            probability: binary.probability,
            natural_language_reason: explanation::failure_reason(
                &machine,
                reading,
                &binary,
                &type_prediction,
            ),
            explanation_data,
        })
    }
}
