//! Composition root for the pipeline process.
//!
//! Constructs every shared component (pool, store, classifier client,
//! predictor, coordinator, limiters) once at startup, wires the
//! scheduler loops, and runs until interrupted. No teardown is required
//! beyond process exit: in-flight batches are lost on shutdown and their
//! readings re-discovered on the next start.

use failcast_core::client::{HttpClassifier, Predictor};
use failcast_core::config::FailcastConfig;
use failcast_core::constants::defaults;
use failcast_core::orchestration::{scheduler, BatchConfig, BatchCoordinator, SyntheticDataGenerator};
use failcast_core::resilience::RateLimiter;
use failcast_core::storage::PgStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    failcast_core::logging::init_structured_logging();

    let config = FailcastConfig::from_env()?;
    info!(
        classifier = %config.classifier_base_url,
        batch_size = config.batch_size,
        "Starting failcast pipeline"
    );

    let pool = failcast_core::database::connect(&config).await?;
    let storage = Arc::new(PgStore::new(pool));

    let classifier = Arc::new(HttpClassifier::new(
        config.classifier_base_url.clone(),
        config.classifier_timeout,
    )?);
    let predictor = Arc::new(Predictor::new(
        storage.clone(),
        classifier,
        config.machine_cache_ttl,
    ));

    let coordinator = Arc::new(BatchCoordinator::new(
        storage.clone(),
        predictor,
        BatchConfig::from_config(&config),
    ));
    let generator = Arc::new(SyntheticDataGenerator::new(storage));

    // Limiters for the externally-facing chat entry point and the classifier
    // budget; the API layer consults these, the batch path does not.
    let chat_daily = Arc::new(RateLimiter::new(config.chat_daily_limit));
    let chat_burst = Arc::new(RateLimiter::new(config.chat_burst_limit));
    let classifier_budget = Arc::new(RateLimiter::new(config.classifier_limit));

    let _processor = scheduler::spawn_batch_processor(coordinator, config.processor_interval);
    let _generator = scheduler::spawn_data_generator(generator, config.generator_interval);
    let _cleanup = scheduler::spawn_limiter_cleanup(
        vec![chat_daily, chat_burst, classifier_budget],
        Duration::from_secs(defaults::LIMITER_CLEANUP_INTERVAL_SECS),
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received; exiting");

    Ok(())
}
