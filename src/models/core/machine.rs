//! # Machine Model
//!
//! Reference data describing one industrial machine. The pipeline treats
//! machines as read-only input: the risk type selects classifier behavior
//! and the identity fields feed prediction explanations.
//!
//! ## Database Schema
//!
//! Maps to the `machines` table:
//! - `machine_id`: Primary key (UUID)
//! - `code`: Unique human-assigned identifier (VARCHAR)
//! - `machine_type`: Single-character risk class L/M/H (CHAR(1))
//! - `status`: ACTIVE / MAINTENANCE / DECOMMISSIONED (VARCHAR)
//! - `metadata`: Free-form JSONB

use crate::error::{FailcastError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// One machine on the factory floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Machine {
    pub machine_id: Uuid,
    pub code: String,
    pub name: String,
    /// Risk class stored as a single character; parse with [`Machine::risk_type`].
    pub machine_type: String,
    pub location: String,
    pub status: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Machine {
    /// Parse the stored risk class into a typed value.
    ///
    /// An unrecognized character means the row predates the current risk
    /// taxonomy; callers treat that as a validation failure rather than
    /// guessing a class.
    pub fn risk_type(&self) -> Result<MachineType> {
        MachineType::try_from(self.machine_type.as_str())
    }

    /// Human-facing identity used in prediction narratives, e.g. `"Lathe 3 (MCH-003)"`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }

    pub fn is_active(&self) -> bool {
        self.status == crate::constants::machine_status::ACTIVE
    }
}

/// Machine risk class, used by the classifier to pick model behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineType {
    Low,
    Medium,
    High,
}

impl MachineType {
    /// Wire representation expected by the classifier service.
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::Low => "L",
            MachineType::Medium => "M",
            MachineType::High => "H",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MachineType {
    type Error = FailcastError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "L" => Ok(MachineType::Low),
            "M" => Ok(MachineType::Medium),
            "H" => Ok(MachineType::High),
            other => Err(FailcastError::Validation(format!(
                "Unknown machine type: {other}"
            ))),
        }
    }
}
