//! Transport layer for the classifier service.

use crate::client::types::{
    BinaryPrediction, ClassifierRequest, Envelope, HealthStatus, TypePrediction,
};
use crate::error::FailcastError;
use crate::models::{MachineType, SensorReading};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Errors from one classifier call.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Network failure, connect/read timeout, or request build error.
    #[error("classifier transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("classifier returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the endpoint's documented shape.
    #[error("unexpected classifier payload: {0}")]
    Protocol(String),
}

impl From<ClassifierError> for FailcastError {
    fn from(err: ClassifierError) -> Self {
        FailcastError::ServiceUnavailable(err.to_string())
    }
}

/// The classifier seam. Production uses [`HttpClassifier`]; tests script
/// their own implementation.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ClassifierError>;

    async fn predict_binary(
        &self,
        reading: &SensorReading,
        machine_type: MachineType,
    ) -> Result<BinaryPrediction, ClassifierError>;

    /// Only called after `predict_binary` reports a failure.
    async fn predict_type(
        &self,
        reading: &SensorReading,
        machine_type: MachineType,
    ) -> Result<TypePrediction, ClassifierError>;
}

/// HTTP implementation against the failure-classification service.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    /// Build a client with a per-call timeout. Classifier calls are the
    /// primary risk of unbounded hang, so the timeout applies to every
    /// request this client issues.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClassifierError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClassifierError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| ClassifierError::Protocol(e.to_string()))?;
        Ok(envelope.data)
    }

    async fn predict<T: DeserializeOwned>(
        &self,
        path: &str,
        reading: &SensorReading,
        machine_type: MachineType,
    ) -> Result<T, ClassifierError> {
        let body = ClassifierRequest::from_reading(reading, machine_type);
        debug!(
            reading_id = %reading.reading_id,
            machine_type = %machine_type,
            path,
            "Calling classifier"
        );

        let response = self.http.post(self.endpoint(path)).json(&body).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn health(&self) -> Result<HealthStatus, ClassifierError> {
        let response = self
            .http
            .get(self.endpoint("/api/v1/failure/health"))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn predict_binary(
        &self,
        reading: &SensorReading,
        machine_type: MachineType,
    ) -> Result<BinaryPrediction, ClassifierError> {
        self.predict("/api/v1/failure/predict/binary", reading, machine_type)
            .await
    }

    async fn predict_type(
        &self,
        reading: &SensorReading,
        machine_type: MachineType,
    ) -> Result<TypePrediction, ClassifierError> {
        self.predict("/api/v1/failure/predict/type", reading, machine_type)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client =
            HttpClassifier::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("/api/v1/failure/health"),
            "http://localhost:8000/api/v1/failure/health"
        );
    }

    #[test]
    fn classifier_errors_map_to_service_unavailable() {
        let err = ClassifierError::Status {
            status: 503,
            body: "model loading".to_string(),
        };
        assert!(matches!(
            FailcastError::from(err),
            FailcastError::ServiceUnavailable(_)
        ));
    }
}
