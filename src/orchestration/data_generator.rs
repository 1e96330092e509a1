//! # Synthetic Data Generator
//!
//! Feeds the pipeline in non-production contexts by inserting one realistic
//! unprocessed reading per ACTIVE machine. A failing machine never stops
//! generation for the rest.

use crate::error::Result;
use crate::models::{Machine, NewSensorReading, SensorReading};
use crate::orchestration::types::{GenerationOutcome, GenerationReport};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub struct SyntheticDataGenerator {
    storage: Arc<dyn Storage>,
}

impl SyntheticDataGenerator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Insert one random reading for every ACTIVE machine.
    pub async fn generate_for_all_machines(&self) -> Result<GenerationReport> {
        let machines = self.storage.active_machines().await?;

        if machines.is_empty() {
            info!("No active machines to generate data for");
            return Ok(GenerationReport::default());
        }

        info!(count = machines.len(), "Generating sensor data for active machines");

        let mut results = Vec::with_capacity(machines.len());
        for machine in &machines {
            match self.generate_for_machine(machine).await {
                Ok(reading) => {
                    info!(
                        machine = %machine.display_name(),
                        reading_id = %reading.reading_id,
                        "Generated sensor data"
                    );
                    results.push(GenerationOutcome {
                        success: true,
                        machine_id: machine.machine_id,
                        machine_name: machine.name.clone(),
                        reading_id: Some(reading.reading_id),
                        error: None,
                    });
                }
                Err(err) => {
                    error!(machine = %machine.display_name(), %err, "Failed to generate sensor data");
                    results.push(GenerationOutcome {
                        success: false,
                        machine_id: machine.machine_id,
                        machine_name: machine.name.clone(),
                        reading_id: None,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        let report = GenerationReport::from_outcomes(results);
        info!(
            total = report.total,
            successful = report.successful,
            failed = report.failed,
            "Generation complete"
        );
        Ok(report)
    }

    async fn generate_for_machine(&self, machine: &Machine) -> Result<SensorReading> {
        self.storage
            .insert_reading(random_reading(machine.machine_id))
            .await
    }
}

/// Realistic operating ranges for the AI4I-style sensor suite.
fn random_reading(machine_id: Uuid) -> NewSensorReading {
    NewSensorReading {
        machine_id,
        air_temperature_k: round1(295.0 + fastrand::f64() * 10.0),
        process_temperature_k: round1(305.0 + fastrand::f64() * 10.0),
        rotational_speed_rpm: fastrand::i32(1200..2000),
        torque_nm: round1(20.0 + fastrand::f64() * 50.0),
        tool_wear_min: fastrand::i32(0..250),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_values_stay_in_range() {
        for _ in 0..100 {
            let reading = random_reading(Uuid::new_v4());
            assert!((295.0..=305.0).contains(&reading.air_temperature_k));
            assert!((305.0..=315.0).contains(&reading.process_temperature_k));
            assert!((1200..2000).contains(&reading.rotational_speed_rpm));
            assert!((20.0..=70.0).contains(&reading.torque_nm));
            assert!((0..250).contains(&reading.tool_wear_min));
        }
    }
}
