//! # Data Model Layer
//!
//! Persistence-mapped entities for the prediction pipeline. Rows map to the
//! `machines`, `sensor_readings` and `ai_predictions` tables; each entity has
//! a companion `New*` struct for inserts (generated fields omitted).

pub mod core;

pub use core::machine::{Machine, MachineType};
pub use core::prediction::{NewPrediction, Prediction};
pub use core::sensor_reading::{NewSensorReading, SensorReading};
