//! Entity builders with sensible defaults.

use crate::constants::machine_status;
use crate::models::{Machine, NewSensorReading};
use chrono::Utc;
use uuid::Uuid;

pub fn machine(code: &str, name: &str) -> Machine {
    Machine {
        machine_id: Uuid::new_v4(),
        code: code.to_string(),
        name: name.to_string(),
        machine_type: "M".to_string(),
        location: "Factory Floor 1".to_string(),
        status: machine_status::ACTIVE.to_string(),
        metadata: serde_json::json!({}),
        created_at: Utc::now(),
    }
}

pub fn machine_with_status(code: &str, name: &str, status: &str) -> Machine {
    let mut built = machine(code, name);
    built.status = status.to_string();
    built
}

/// Reading with every metric inside its safe operating range.
pub fn nominal_reading(machine_id: Uuid) -> NewSensorReading {
    NewSensorReading {
        machine_id,
        air_temperature_k: 298.4,
        process_temperature_k: 308.9,
        rotational_speed_rpm: 1540,
        torque_nm: 41.5,
        tool_wear_min: 108,
    }
}

/// Reading with tool wear past its risk threshold.
pub fn worn_tool_reading(machine_id: Uuid) -> NewSensorReading {
    NewSensorReading {
        tool_wear_min: 210,
        ..nominal_reading(machine_id)
    }
}
