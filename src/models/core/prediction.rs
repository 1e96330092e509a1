//! # Prediction Model
//!
//! The classifier's verdict for one sensor reading: a failure flag, the
//! failure type when one is predicted, a confidence score, the raw classifier
//! payloads kept for audit, and a natural-language explanation.
//!
//! One-to-one with readings (`reading_id` is unique); created only by the
//! batch coordinator and immutable from the pipeline's perspective.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub prediction_id: Uuid,
    pub reading_id: Uuid,
    /// Denormalized from the reading for query convenience.
    pub machine_id: Uuid,
    pub is_failure: bool,
    pub failure_type: Option<String>,
    pub confidence_score: f64,
    /// Raw classifier responses plus derived machine info.
    pub explanation_data: serde_json::Value,
    pub natural_language_reason: String,
    pub created_at: DateTime<Utc>,
}

/// Prediction awaiting insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrediction {
    pub reading_id: Uuid,
    pub machine_id: Uuid,
    pub is_failure: bool,
    pub failure_type: Option<String>,
    pub confidence_score: f64,
    pub explanation_data: serde_json::Value,
    pub natural_language_reason: String,
}
