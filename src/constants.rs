//! # Domain Constants
//!
//! Operating thresholds and pipeline defaults shared across the crate.
//! The thresholds come from the sensor domain (AI4I-style operating ranges)
//! and drive the risk-factor call-outs in prediction explanations.

/// Sensor thresholds beyond which a metric is called out as a risk factor.
pub mod thresholds {
    /// Air temperature above this is flagged (Kelvin).
    pub const AIR_TEMPERATURE_HIGH_K: f64 = 303.0;
    /// Process temperature above this is flagged (Kelvin).
    pub const PROCESS_TEMPERATURE_HIGH_K: f64 = 313.0;
    /// Tool wear above this is flagged (minutes).
    pub const TOOL_WEAR_HIGH_MIN: i32 = 200;
    /// Torque above this is flagged (Newton-metres).
    pub const TORQUE_HIGH_NM: f64 = 60.0;
    /// Rotational speed below this is flagged (RPM).
    pub const ROTATIONAL_SPEED_LOW_RPM: i32 = 1300;
}

/// Pipeline tunables. All of these can be overridden through
/// [`FailcastConfig`](crate::config::FailcastConfig).
pub mod defaults {
    /// Readings processed concurrently per batch.
    pub const BATCH_SIZE: usize = 5;
    /// Pause between batches to throttle load on the classifier.
    pub const INTER_BATCH_DELAY_MS: u64 = 200;
    /// How long resolved machine metadata stays cached.
    pub const MACHINE_CACHE_TTL_SECS: u64 = 600;
    /// Batch processor scheduling interval.
    pub const PROCESSOR_INTERVAL_MINUTES: u64 = 5;
    /// Synthetic data generation interval.
    pub const GENERATOR_INTERVAL_HOURS: u64 = 1;
    /// Rate limiter key sweep interval.
    pub const LIMITER_CLEANUP_INTERVAL_SECS: u64 = 300;
    /// Page size for the cursor-paginated listers.
    pub const PAGE_LIMIT: usize = 50;
    /// Per-call timeout for classifier requests.
    pub const CLASSIFIER_TIMEOUT_SECS: u64 = 30;
}

/// Machine lifecycle states as stored in the `status` column.
pub mod machine_status {
    pub const ACTIVE: &str = "ACTIVE";
    pub const MAINTENANCE: &str = "MAINTENANCE";
    pub const DECOMMISSIONED: &str = "DECOMMISSIONED";
}
