use crate::constants::defaults;
use crate::error::{FailcastError, Result};
use crate::resilience::RateLimitConfig;
use std::time::Duration;

/// Process-wide configuration, assembled once by the composition root.
#[derive(Debug, Clone)]
pub struct FailcastConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub classifier_base_url: String,
    pub classifier_timeout: Duration,
    pub batch_size: usize,
    pub inter_batch_delay: Duration,
    pub processor_interval: Duration,
    pub generator_interval: Duration,
    pub machine_cache_ttl: Duration,
    /// Daily per-user budget for the chat endpoint.
    pub chat_daily_limit: RateLimitConfig,
    /// Burst protection for the chat endpoint.
    pub chat_burst_limit: RateLimitConfig,
    /// System-wide budget for classifier calls.
    pub classifier_limit: RateLimitConfig,
}

impl Default for FailcastConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/failcast_development".to_string(),
            max_connections: 10,
            classifier_base_url: "http://localhost:8000".to_string(),
            classifier_timeout: Duration::from_secs(defaults::CLASSIFIER_TIMEOUT_SECS),
            batch_size: defaults::BATCH_SIZE,
            inter_batch_delay: Duration::from_millis(defaults::INTER_BATCH_DELAY_MS),
            processor_interval: Duration::from_secs(defaults::PROCESSOR_INTERVAL_MINUTES * 60),
            generator_interval: Duration::from_secs(defaults::GENERATOR_INTERVAL_HOURS * 3600),
            machine_cache_ttl: Duration::from_secs(defaults::MACHINE_CACHE_TTL_SECS),
            chat_daily_limit: RateLimitConfig {
                max_requests: 50,
                window: Duration::from_secs(24 * 60 * 60),
            },
            chat_burst_limit: RateLimitConfig {
                max_requests: 10,
                window: Duration::from_secs(60),
            },
            classifier_limit: RateLimitConfig {
                max_requests: 200,
                window: Duration::from_secs(60),
            },
        }
    }
}

impl FailcastConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(url) = std::env::var("CLASSIFIER_API_URL") {
            config.classifier_base_url = url;
        }

        if let Ok(batch_size) = std::env::var("FAILCAST_BATCH_SIZE") {
            config.batch_size = batch_size
                .parse()
                .map_err(|e| FailcastError::Configuration(format!("Invalid batch_size: {e}")))?;
        }

        if let Ok(delay_ms) = std::env::var("FAILCAST_INTER_BATCH_DELAY_MS") {
            let delay_ms: u64 = delay_ms.parse().map_err(|e| {
                FailcastError::Configuration(format!("Invalid inter_batch_delay_ms: {e}"))
            })?;
            config.inter_batch_delay = Duration::from_millis(delay_ms);
        }

        if let Ok(minutes) = std::env::var("FAILCAST_PROCESSOR_INTERVAL_MINUTES") {
            let minutes: u64 = minutes.parse().map_err(|e| {
                FailcastError::Configuration(format!("Invalid processor_interval_minutes: {e}"))
            })?;
            config.processor_interval = Duration::from_secs(minutes * 60);
        }

        if let Ok(hours) = std::env::var("FAILCAST_GENERATOR_INTERVAL_HOURS") {
            let hours: u64 = hours.parse().map_err(|e| {
                FailcastError::Configuration(format!("Invalid generator_interval_hours: {e}"))
            })?;
            config.generator_interval = Duration::from_secs(hours * 3600);
        }

        if let Ok(secs) = std::env::var("FAILCAST_MACHINE_CACHE_TTL_SECS") {
            let secs: u64 = secs.parse().map_err(|e| {
                FailcastError::Configuration(format!("Invalid machine_cache_ttl_secs: {e}"))
            })?;
            config.machine_cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
