//! # Orchestration Module
//!
//! The asynchronous batch prediction pipeline: the [`BatchCoordinator`]
//! discovers unprocessed readings and runs them through the classifier under
//! bounded concurrency, the [`SyntheticDataGenerator`] feeds the pipeline in
//! non-production contexts, and the [`scheduler`] loops trigger both on
//! fixed intervals.

pub mod batch_coordinator;
pub mod data_generator;
pub mod scheduler;
pub mod types;

pub use batch_coordinator::{BatchConfig, BatchCoordinator};
pub use data_generator::SyntheticDataGenerator;
pub use types::{
    BatchRunOutcome, BatchRunReport, GenerationOutcome, GenerationReport, ItemOutcome,
};
