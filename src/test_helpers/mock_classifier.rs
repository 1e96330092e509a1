//! Scripted [`Classifier`] implementation.
//!
//! Defaults to a healthy service that predicts "no failure" for everything;
//! individual readings can be scripted to fail the transport, predict a
//! failure, or return a specific type verdict. Call counters let tests
//! assert how far a run got.

use crate::client::classifier::{Classifier, ClassifierError};
use crate::client::types::{BinaryPrediction, HealthStatus, TypePrediction};
use crate::models::{MachineType, SensorReading};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
enum BinaryScript {
    Respond(BinaryPrediction),
    Fail(String),
}

pub struct MockClassifier {
    health: Mutex<Result<HealthStatus, String>>,
    binary_scripts: Mutex<HashMap<Uuid, BinaryScript>>,
    type_scripts: Mutex<HashMap<Uuid, TypePrediction>>,
    /// Artificial latency per prediction call, for in-flight scenarios.
    latency: Mutex<Option<Duration>>,
    pub health_calls: AtomicUsize,
    pub binary_calls: AtomicUsize,
    pub type_calls: AtomicUsize,
}

impl MockClassifier {
    /// Healthy service, everything predicted as no-failure.
    pub fn healthy() -> Self {
        Self {
            health: Mutex::new(Ok(HealthStatus {
                binary_model_loaded: true,
                failure_type_model_loaded: true,
            })),
            binary_scripts: Mutex::new(HashMap::new()),
            type_scripts: Mutex::new(HashMap::new()),
            latency: Mutex::new(None),
            health_calls: AtomicUsize::new(0),
            binary_calls: AtomicUsize::new(0),
            type_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_health(&self, binary_model_loaded: bool, failure_type_model_loaded: bool) {
        *self.health.lock() = Ok(HealthStatus {
            binary_model_loaded,
            failure_type_model_loaded,
        });
    }

    pub fn fail_health(&self, message: &str) {
        *self.health.lock() = Err(message.to_string());
    }

    /// Script a failure verdict for one reading.
    pub fn predict_failure(&self, reading_id: Uuid, failure_type: &str, confidence: f64) {
        self.binary_scripts.lock().insert(
            reading_id,
            BinaryScript::Respond(binary_failure(0.87, 0.91)),
        );
        self.type_scripts
            .lock()
            .insert(reading_id, type_prediction(failure_type, confidence, false));
    }

    /// Script an ambiguous failure verdict for one reading.
    pub fn predict_ambiguous_failure(&self, reading_id: Uuid, failure_type: &str) {
        self.binary_scripts.lock().insert(
            reading_id,
            BinaryScript::Respond(binary_failure(0.71, 0.55)),
        );
        self.type_scripts
            .lock()
            .insert(reading_id, type_prediction(failure_type, 0.52, true));
    }

    /// Script a transport failure for one reading's binary call.
    pub fn fail_binary(&self, reading_id: Uuid, message: &str) {
        self.binary_scripts
            .lock()
            .insert(reading_id, BinaryScript::Fail(message.to_string()));
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn health(&self) -> Result<HealthStatus, ClassifierError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.health
            .lock()
            .clone()
            .map_err(ClassifierError::Protocol)
    }

    async fn predict_binary(
        &self,
        reading: &SensorReading,
        _machine_type: MachineType,
    ) -> Result<BinaryPrediction, ClassifierError> {
        self.binary_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let script = self.binary_scripts.lock().get(&reading.reading_id).cloned();
        match script {
            Some(BinaryScript::Respond(prediction)) => Ok(prediction),
            Some(BinaryScript::Fail(message)) => Err(ClassifierError::Status {
                status: 503,
                body: message,
            }),
            None => Ok(binary_normal(0.05, 0.95)),
        }
    }

    async fn predict_type(
        &self,
        reading: &SensorReading,
        _machine_type: MachineType,
    ) -> Result<TypePrediction, ClassifierError> {
        self.type_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let script = self.type_scripts.lock().get(&reading.reading_id).cloned();
        Ok(script.unwrap_or_else(|| type_prediction("Random Failures", 0.5, false)))
    }
}

pub fn binary_normal(probability: f64, confidence: f64) -> BinaryPrediction {
    BinaryPrediction {
        prediction: 0,
        prediction_label: "not failed".to_string(),
        probability,
        confidence,
        input_data: serde_json::Value::Null,
    }
}

pub fn binary_failure(probability: f64, confidence: f64) -> BinaryPrediction {
    BinaryPrediction {
        prediction: 1,
        prediction_label: "failed".to_string(),
        probability,
        confidence,
        input_data: serde_json::Value::Null,
    }
}

pub fn type_prediction(label: &str, confidence: f64, ambiguous: bool) -> TypePrediction {
    TypePrediction {
        prediction: label.to_string(),
        probabilities: HashMap::from([(label.to_string(), confidence)]),
        confidence,
        ambiguous,
        top_k: None,
        suggested_override: None,
        input_data: serde_json::Value::Null,
    }
}
