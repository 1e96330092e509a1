//! Request and response types for the classifier endpoints.
//!
//! The service wraps every response in a `{status_code, message, data}`
//! envelope; `data` is endpoint-specific. Unknown fields are tolerated,
//! missing required fields fail deserialization and surface as protocol
//! errors.

use crate::models::{MachineType, SensorReading};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Body sent to both prediction endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierRequest {
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub machine_type: String,
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: i32,
    pub torque: f64,
    pub tool_wear: i32,
}

impl ClassifierRequest {
    pub fn from_reading(reading: &SensorReading, machine_type: MachineType) -> Self {
        Self {
            product_id: reading.reading_id,
            machine_type: machine_type.as_str().to_string(),
            air_temperature: reading.air_temperature_k,
            process_temperature: reading.process_temperature_k,
            rotational_speed: reading.rotational_speed_rpm,
            torque: reading.torque_nm,
            tool_wear: reading.tool_wear_min,
        }
    }
}

/// Response envelope common to all classifier endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status_code: i32,
    pub message: String,
    pub data: T,
}

/// `GET /api/v1/failure/health` payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthStatus {
    pub binary_model_loaded: bool,
    pub failure_type_model_loaded: bool,
}

impl HealthStatus {
    /// Both models must be loaded before a batch run may start.
    pub fn all_models_loaded(&self) -> bool {
        self.binary_model_loaded && self.failure_type_model_loaded
    }
}

/// `POST /api/v1/failure/predict/binary` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryPrediction {
    /// 0 = no failure, 1 = failure.
    pub prediction: i32,
    pub prediction_label: String,
    pub probability: f64,
    pub confidence: f64,
    #[serde(default)]
    pub input_data: serde_json::Value,
}

impl BinaryPrediction {
    pub fn is_failure(&self) -> bool {
        self.prediction == 1
    }
}

/// `POST /api/v1/failure/predict/type` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypePrediction {
    /// Predicted failure class, e.g. "Tool Wear Failure".
    pub prediction: String,
    pub probabilities: HashMap<String, f64>,
    pub confidence: f64,
    /// Set when the top classes are too close to call.
    #[serde(default)]
    pub ambiguous: bool,
    #[serde(default)]
    pub top_k: Option<Vec<RankedClass>>,
    #[serde(default)]
    pub suggested_override: Option<String>,
    #[serde(default)]
    pub input_data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedClass {
    pub label: String,
    pub prob: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_wire_field_names() {
        let reading = SensorReading {
            reading_id: Uuid::new_v4(),
            machine_id: Uuid::new_v4(),
            air_temperature_k: 300.1,
            process_temperature_k: 310.2,
            rotational_speed_rpm: 1500,
            torque_nm: 40.0,
            tool_wear_min: 100,
            is_processed: false,
            processed_at: None,
            recorded_at: chrono::Utc::now(),
        };

        let body = serde_json::to_value(ClassifierRequest::from_reading(
            &reading,
            MachineType::Medium,
        ))
        .unwrap();

        assert_eq!(body["type"], "M");
        assert_eq!(body["air_temperature"], 300.1);
        assert_eq!(body["tool_wear"], 100);
    }

    #[test]
    fn type_payload_tolerates_missing_optionals() {
        let raw = r#"{
            "prediction": "Heat Dissipation Failure",
            "probabilities": {"Heat Dissipation Failure": 0.9},
            "confidence": 0.9
        }"#;

        let parsed: TypePrediction = serde_json::from_str(raw).unwrap();
        assert!(!parsed.ambiguous);
        assert!(parsed.top_k.is_none());
    }

    #[test]
    fn binary_flag_maps_from_integer() {
        let raw = r#"{
            "prediction": 1,
            "prediction_label": "failed",
            "probability": 0.87,
            "confidence": 0.91
        }"#;

        let parsed: BinaryPrediction = serde_json::from_str(raw).unwrap();
        assert!(parsed.is_failure());
    }
}
