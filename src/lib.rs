#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Failcast Core
//!
//! Rust core of the predictive-maintenance platform: an asynchronous batch
//! prediction pipeline that discovers unprocessed sensor readings, calls an
//! external failure-classification service under bounded concurrency,
//! persists the resulting predictions, and exposes them through
//! keyset-paginated read APIs.
//!
//! ## Architecture
//!
//! A scheduler loop triggers the [`orchestration::BatchCoordinator`], which
//! partitions pending readings into fixed-size batches and fans each batch
//! out concurrently through the [`client::Predictor`]. The predictor
//! resolves machine metadata through a TTL cache, runs the two-stage
//! classifier call (binary failure flag, then failure-type classification
//! only when a failure is predicted), and synthesizes an operator-facing
//! explanation. Successful predictions are persisted and their source rows
//! marked processed as one transactional unit; per-item failures are
//! recorded in the run report without aborting siblings.
//!
//! ## Module Organization
//!
//! - [`models`] - Persistence-mapped entities (machines, readings, predictions)
//! - [`storage`] - The persistence seam and its PostgreSQL implementation
//! - [`client`] - Classifier service adapter and prediction orchestration
//! - [`orchestration`] - Batch coordinator, synthetic generator, scheduler loops
//! - [`resilience`] - TTL lookup cache and sliding-window rate limiters
//! - [`pagination`] - Keyset pagination shared by all list-read operations
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//!
//! ## Failure Philosophy
//!
//! Nothing in this core is fatal to the hosting process. Preflight failures
//! soft-skip a run, per-item failures are aggregated into the run report,
//! and scheduler ticks outlive any error their body produces.

pub mod client;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod pagination;
pub mod resilience;
pub mod storage;
pub mod test_helpers;

pub use client::{Classifier, ClassifierError, CombinedPrediction, HttpClassifier, Predictor};
pub use config::FailcastConfig;
pub use error::{FailcastError, Result};
pub use models::{Machine, MachineType, NewPrediction, NewSensorReading, Prediction, SensorReading};
pub use orchestration::{
    BatchConfig, BatchCoordinator, BatchRunOutcome, BatchRunReport, ItemOutcome,
    SyntheticDataGenerator,
};
pub use pagination::{CursorPage, PageRequest};
pub use resilience::{RateLimitConfig, RateLimiter, TtlCache};
pub use storage::{PgStore, PredictionFilter, ReadingFilter, Storage};
