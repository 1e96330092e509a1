//! Outcome and report types for coordinator and generator runs.

use serde::Serialize;
use uuid::Uuid;

/// Result of processing one sensor reading.
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub success: bool,
    pub reading_id: Uuid,
    pub prediction_id: Option<Uuid>,
    pub error: Option<String>,
}

impl ItemOutcome {
    pub fn succeeded(reading_id: Uuid, prediction_id: Uuid) -> Self {
        Self {
            success: true,
            reading_id,
            prediction_id: Some(prediction_id),
            error: None,
        }
    }

    pub fn failed(reading_id: Uuid, error: String) -> Self {
        Self {
            success: false,
            reading_id,
            prediction_id: None,
            error: Some(error),
        }
    }
}

/// Aggregated result of one batch run. `total == successful + failed` and
/// `total == results.len()` always hold.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchRunReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ItemOutcome>,
}

impl BatchRunReport {
    /// The zero-valued report returned when preflight soft-skips or nothing
    /// is pending.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_outcomes(results: Vec<ItemOutcome>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }
}

/// What a trigger produced. A trigger that lost the single-flight race is a
/// no-op reported as [`BatchRunOutcome::AlreadyRunning`].
#[derive(Debug)]
pub enum BatchRunOutcome {
    Completed(BatchRunReport),
    AlreadyRunning,
}

impl BatchRunOutcome {
    pub fn report(&self) -> Option<&BatchRunReport> {
        match self {
            BatchRunOutcome::Completed(report) => Some(report),
            BatchRunOutcome::AlreadyRunning => None,
        }
    }
}

/// Result of generating synthetic data for one machine.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub success: bool,
    pub machine_id: Uuid,
    pub machine_name: String,
    pub reading_id: Option<Uuid>,
    pub error: Option<String>,
}

/// Aggregated result of one synthetic-data generation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<GenerationOutcome>,
}

impl GenerationReport {
    pub fn from_outcomes(results: Vec<GenerationOutcome>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_add_up() {
        let reading_a = Uuid::new_v4();
        let reading_b = Uuid::new_v4();
        let report = BatchRunReport::from_outcomes(vec![
            ItemOutcome::succeeded(reading_a, Uuid::new_v4()),
            ItemOutcome::failed(reading_b, "classifier timeout".to_string()),
        ]);

        assert_eq!(report.total, 2);
        assert_eq!(report.successful, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total, report.results.len());
    }

    #[test]
    fn empty_report_is_zero_valued() {
        let report = BatchRunReport::empty();
        assert_eq!(report.total, 0);
        assert_eq!(report.successful, 0);
        assert_eq!(report.failed, 0);
        assert!(report.results.is_empty());
    }
}
