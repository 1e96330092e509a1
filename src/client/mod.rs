//! # Prediction Client
//!
//! Adapter between the pipeline and the external failure-classification
//! service. Payloads are typed per endpoint and validated at the boundary;
//! any shape the service sends that we cannot interpret is treated as a
//! protocol error, never passed through silently.
//!
//! [`Classifier`] is the transport seam: [`HttpClassifier`] talks to the
//! real service, tests script their own implementation. [`Predictor`] sits
//! above the seam and orchestrates the two-stage call (binary failure flag,
//! then failure-type classification only when a failure is predicted),
//! resolving machine metadata through a TTL cache.

pub mod classifier;
pub mod explanation;
pub mod predictor;
pub mod types;

pub use classifier::{Classifier, ClassifierError, HttpClassifier};
pub use predictor::{CombinedPrediction, Predictor};
pub use types::{BinaryPrediction, ClassifierRequest, Envelope, HealthStatus, TypePrediction};
