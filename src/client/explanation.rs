//! Natural-language explanation synthesis.
//!
//! Combines machine identity, the classifier verdicts and threshold-based
//! risk factors into the operator-facing narrative persisted alongside each
//! prediction.

use crate::client::types::{BinaryPrediction, TypePrediction};
use crate::constants::thresholds;
use crate::models::{Machine, SensorReading};

/// Sensor metrics outside their safe operating range, phrased for the
/// narrative, e.g. `"high tool wear (210 min)"`.
pub fn risk_factors(reading: &SensorReading) -> Vec<String> {
    let mut factors = Vec::new();

    if reading.air_temperature_k > thresholds::AIR_TEMPERATURE_HIGH_K {
        factors.push(format!(
            "high air temperature ({} K)",
            reading.air_temperature_k
        ));
    }

    if reading.process_temperature_k > thresholds::PROCESS_TEMPERATURE_HIGH_K {
        factors.push(format!(
            "high process temperature ({} K)",
            reading.process_temperature_k
        ));
    }

    if reading.tool_wear_min > thresholds::TOOL_WEAR_HIGH_MIN {
        factors.push(format!("high tool wear ({} min)", reading.tool_wear_min));
    }

    if reading.torque_nm > thresholds::TORQUE_HIGH_NM {
        factors.push(format!("high torque ({} Nm)", reading.torque_nm));
    }

    if reading.rotational_speed_rpm < thresholds::ROTATIONAL_SPEED_LOW_RPM {
        factors.push(format!(
            "low rotational speed ({} RPM)",
            reading.rotational_speed_rpm
        ));
    }

    factors
}

/// Narrative for a predicted failure.
pub fn failure_reason(
    machine: &Machine,
    reading: &SensorReading,
    binary: &BinaryPrediction,
    type_prediction: &TypePrediction,
) -> String {
    let confidence = type_prediction.confidence * 100.0;
    let probability = binary.probability * 100.0;

    let mut reason = format!(
        "Machine {} is predicted to experience {} with {confidence:.2}% confidence. ",
        machine.display_name(),
        type_prediction.prediction
    );
    reason.push_str(&format!("Failure probability: {probability:.2}%."));

    let factors = risk_factors(reading);
    if !factors.is_empty() {
        reason.push_str(&format!(" Risk factors: {}.", factors.join(", ")));
    }

    if type_prediction.ambiguous {
        reason.push_str(
            " Caution: the failure-type classification is ambiguous; manual verification is recommended.",
        );
    }

    reason
}

/// Narrative when no failure is predicted.
pub fn normal_reason(machine: &Machine, binary: &BinaryPrediction) -> String {
    let probability = binary.probability * 100.0;
    format!(
        "Machine {} is operating normally. Failure probability is low ({probability:.2}%). All sensor parameters are within safe limits.",
        machine.display_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn nominal_reading() -> SensorReading {
        SensorReading {
            reading_id: Uuid::new_v4(),
            machine_id: Uuid::new_v4(),
            air_temperature_k: 298.0,
            process_temperature_k: 308.0,
            rotational_speed_rpm: 1500,
            torque_nm: 40.0,
            tool_wear_min: 100,
            is_processed: false,
            processed_at: None,
            recorded_at: Utc::now(),
        }
    }

    fn machine() -> Machine {
        Machine {
            machine_id: Uuid::new_v4(),
            code: "MCH-003".to_string(),
            name: "Lathe 3".to_string(),
            machine_type: "M".to_string(),
            location: "Factory Floor 1".to_string(),
            status: "ACTIVE".to_string(),
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
        }
    }

    fn binary(probability: f64) -> BinaryPrediction {
        BinaryPrediction {
            prediction: 1,
            prediction_label: "failed".to_string(),
            probability,
            confidence: 0.9,
            input_data: serde_json::Value::Null,
        }
    }

    #[test]
    fn nominal_reading_has_no_risk_factors() {
        assert!(risk_factors(&nominal_reading()).is_empty());
    }

    #[test]
    fn each_threshold_breach_is_called_out() {
        let mut reading = nominal_reading();
        reading.air_temperature_k = 304.0;
        reading.process_temperature_k = 314.0;
        reading.tool_wear_min = 210;
        reading.torque_nm = 62.0;
        reading.rotational_speed_rpm = 1250;

        let factors = risk_factors(&reading);
        assert_eq!(factors.len(), 5);
        assert!(factors.iter().any(|f| f.contains("tool wear")));
        assert!(factors.iter().any(|f| f.contains("rotational speed")));
    }

    #[test]
    fn boundary_values_are_not_flagged() {
        let mut reading = nominal_reading();
        reading.air_temperature_k = 303.0;
        reading.tool_wear_min = 200;
        reading.rotational_speed_rpm = 1300;

        assert!(risk_factors(&reading).is_empty());
    }

    #[test]
    fn failure_reason_mentions_type_and_factors() {
        let mut reading = nominal_reading();
        reading.tool_wear_min = 210;

        let type_prediction = TypePrediction {
            prediction: "Tool Wear Failure".to_string(),
            probabilities: Default::default(),
            confidence: 0.93,
            ambiguous: false,
            top_k: None,
            suggested_override: None,
            input_data: serde_json::Value::Null,
        };

        let reason = failure_reason(&machine(), &reading, &binary(0.87), &type_prediction);
        assert!(reason.contains("Lathe 3 (MCH-003)"));
        assert!(reason.contains("Tool Wear Failure"));
        assert!(reason.contains("93.00%"));
        assert!(reason.contains("87.00%"));
        assert!(reason.contains("high tool wear (210 min)"));
        assert!(!reason.contains("ambiguous"));
    }

    #[test]
    fn ambiguous_prediction_adds_caveat() {
        let type_prediction = TypePrediction {
            prediction: "Power Failure".to_string(),
            probabilities: Default::default(),
            confidence: 0.52,
            ambiguous: true,
            top_k: None,
            suggested_override: None,
            input_data: serde_json::Value::Null,
        };

        let reason = failure_reason(&machine(), &nominal_reading(), &binary(0.7), &type_prediction);
        assert!(reason.contains("ambiguous"));
    }

    #[test]
    fn normal_reason_reports_low_probability() {
        let healthy = BinaryPrediction {
            prediction: 0,
            prediction_label: "not failed".to_string(),
            probability: 0.042,
            confidence: 0.96,
            input_data: serde_json::Value::Null,
        };

        let reason = normal_reason(&machine(), &healthy);
        assert!(reason.contains("operating normally"));
        assert!(reason.contains("4.20%"));
    }
}
