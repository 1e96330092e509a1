//! # Sensor Reading Model
//!
//! One timestamped sample of a machine's operating metrics. Readings enter
//! through ingestion or the synthetic generator with `is_processed = false`
//! and are flipped exactly once by the pipeline when their prediction has
//! been durably persisted.
//!
//! ## Database Schema
//!
//! Maps to the `sensor_readings` table. `recorded_at` orders both the
//! coordinator's oldest-first discovery and the descending read APIs; a
//! partial index on `is_processed = false` keeps discovery cheap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SensorReading {
    pub reading_id: Uuid,
    pub machine_id: Uuid,
    pub air_temperature_k: f64,
    pub process_temperature_k: f64,
    pub rotational_speed_rpm: i32,
    pub torque_nm: f64,
    pub tool_wear_min: i32,
    pub is_processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    pub recorded_at: DateTime<Utc>,
}

/// Sensor reading awaiting insertion (generated fields omitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSensorReading {
    pub machine_id: Uuid,
    pub air_temperature_k: f64,
    pub process_temperature_k: f64,
    pub rotational_speed_rpm: i32,
    pub torque_nm: f64,
    pub tool_wear_min: i32,
}
