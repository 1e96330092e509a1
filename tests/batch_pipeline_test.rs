//! End-to-end pipeline behavior against the in-memory store and a scripted
//! classifier: aggregation arithmetic, per-item failure isolation, preflight
//! soft-skips, idempotent reprocessing, explanation content, and the
//! single-flight guard.

use failcast_core::client::Predictor;
use failcast_core::orchestration::{BatchConfig, BatchCoordinator, BatchRunOutcome};
use failcast_core::storage::Storage;
use failcast_core::test_helpers::{
    machine, nominal_reading, worn_tool_reading, InMemoryStore, MockClassifier,
};
use failcast_core::models::NewPrediction;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn coordinator(
    store: &Arc<InMemoryStore>,
    classifier: &Arc<MockClassifier>,
) -> Arc<BatchCoordinator> {
    let predictor = Arc::new(Predictor::new(
        store.clone(),
        classifier.clone(),
        Duration::from_secs(600),
    ));
    Arc::new(BatchCoordinator::new(
        store.clone(),
        predictor,
        BatchConfig {
            batch_size: 5,
            inter_batch_delay: Duration::from_millis(10),
        },
    ))
}

fn expect_report(outcome: BatchRunOutcome) -> failcast_core::orchestration::BatchRunReport {
    match outcome {
        BatchRunOutcome::Completed(report) => report,
        BatchRunOutcome::AlreadyRunning => panic!("run unexpectedly reported AlreadyRunning"),
    }
}

#[tokio::test]
async fn run_processes_every_reading_and_counts_add_up() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());

    let lathe = machine("MCH-001", "Lathe 1");
    store.add_machine(lathe.clone());
    let mut readings = Vec::new();
    for _ in 0..7 {
        readings.push(
            store
                .insert_reading(nominal_reading(lathe.machine_id))
                .await
                .unwrap(),
        );
    }

    let report = expect_report(coordinator(&store, &classifier).run().await.unwrap());

    assert_eq!(report.total, 7);
    assert_eq!(report.successful, 7);
    assert_eq!(report.failed, 0);
    assert_eq!(report.total, report.results.len());
    assert_eq!(store.prediction_count(), 7);
    // Two batches for 7 readings at batch size 5; every item attempted once.
    assert_eq!(classifier.binary_calls.load(Ordering::SeqCst), 7);

    for reading in readings {
        let stored = store.reading(reading.reading_id).unwrap();
        assert!(stored.is_processed);
        assert!(stored.processed_at.is_some());
    }
}

#[tokio::test]
async fn failing_item_never_aborts_its_siblings() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());

    let press = machine("MCH-002", "Press 2");
    store.add_machine(press.clone());

    let mut reading_ids = Vec::new();
    for _ in 0..5 {
        let reading = store
            .insert_reading(nominal_reading(press.machine_id))
            .await
            .unwrap();
        reading_ids.push(reading.reading_id);
    }
    classifier.fail_binary(reading_ids[2], "connection reset by peer");

    let report = expect_report(coordinator(&store, &classifier).run().await.unwrap());

    assert_eq!(report.total, 5);
    assert_eq!(report.successful, 4);
    assert_eq!(report.failed, 1);

    let failed: Vec<_> = report.results.iter().filter(|r| !r.success).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].reading_id, reading_ids[2]);
    assert!(failed[0].error.as_deref().unwrap().contains("503"));

    // The failed reading stays eligible for the next run.
    assert!(!store.reading(reading_ids[2]).unwrap().is_processed);
    assert!(store.reading(reading_ids[0]).unwrap().is_processed);
}

#[tokio::test]
async fn missing_machine_fails_only_that_item() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());

    let known = machine("MCH-003", "Mill 3");
    store.add_machine(known.clone());
    store
        .insert_reading(nominal_reading(known.machine_id))
        .await
        .unwrap();
    let orphan = store
        .insert_reading(nominal_reading(uuid::Uuid::new_v4()))
        .await
        .unwrap();

    let report = expect_report(coordinator(&store, &classifier).run().await.unwrap());

    assert_eq!(report.total, 2);
    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 1);

    let failed = report.results.iter().find(|r| !r.success).unwrap();
    assert_eq!(failed.reading_id, orphan.reading_id);
    assert!(failed.error.as_deref().unwrap().contains("Machine not found"));
}

#[tokio::test]
async fn unloaded_model_soft_skips_the_run() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());
    classifier.set_health(true, false);

    let grinder = machine("MCH-004", "Grinder 4");
    store.add_machine(grinder.clone());
    let reading = store
        .insert_reading(nominal_reading(grinder.machine_id))
        .await
        .unwrap();

    let report = expect_report(coordinator(&store, &classifier).run().await.unwrap());

    assert_eq!(report.total, 0);
    assert_eq!(report.successful, 0);
    assert_eq!(report.failed, 0);
    assert!(report.results.is_empty());
    // No prediction work started: no classifier predictions, nothing stored.
    assert_eq!(classifier.binary_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.prediction_count(), 0);
    assert!(!store.reading(reading.reading_id).unwrap().is_processed);
}

#[tokio::test]
async fn unreachable_health_endpoint_soft_skips_the_run() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());
    classifier.fail_health("connect timeout");

    let report = expect_report(coordinator(&store, &classifier).run().await.unwrap());

    assert_eq!(report.total, 0);
    assert_eq!(classifier.binary_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_backlog_returns_zero_report() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());

    let report = expect_report(coordinator(&store, &classifier).run().await.unwrap());

    assert_eq!(report.total, 0);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn reprocessing_a_reading_keeps_exactly_one_prediction() {
    let store = Arc::new(InMemoryStore::new());

    let saw = machine("MCH-005", "Saw 5");
    store.add_machine(saw.clone());
    let reading = store
        .insert_reading(nominal_reading(saw.machine_id))
        .await
        .unwrap();

    let new_prediction = || NewPrediction {
        reading_id: reading.reading_id,
        machine_id: saw.machine_id,
        is_failure: false,
        failure_type: None,
        confidence_score: 0.95,
        explanation_data: serde_json::json!({}),
        natural_language_reason: "ok".to_string(),
    };

    let first = store.record_prediction(new_prediction()).await.unwrap();
    let second = store.record_prediction(new_prediction()).await.unwrap();

    assert_eq!(store.prediction_count(), 1);
    assert_eq!(first.prediction_id, second.prediction_id);
    assert!(store.reading(reading.reading_id).unwrap().is_processed);
}

#[tokio::test]
async fn worn_tool_failure_reason_mentions_the_risk_factor() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());

    let drill = machine("MCH-006", "Drill 6");
    store.add_machine(drill.clone());
    let reading = store
        .insert_reading(worn_tool_reading(drill.machine_id))
        .await
        .unwrap();
    classifier.predict_failure(reading.reading_id, "Tool Wear Failure", 0.93);

    let report = expect_report(coordinator(&store, &classifier).run().await.unwrap());
    assert_eq!(report.successful, 1);

    let prediction = store
        .prediction_for_reading(reading.reading_id)
        .await
        .unwrap()
        .unwrap();
    assert!(prediction.is_failure);
    assert_eq!(prediction.failure_type.as_deref(), Some("Tool Wear Failure"));
    assert!(prediction.natural_language_reason.contains("high tool wear"));
    assert!(prediction
        .natural_language_reason
        .contains("Tool Wear Failure"));
    assert!(prediction.explanation_data["type_prediction"].is_object());
}

#[tokio::test]
async fn normal_verdict_persists_binary_confidence_and_narrative() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());

    let lathe = machine("MCH-007", "Lathe 7");
    store.add_machine(lathe.clone());
    let reading = store
        .insert_reading(nominal_reading(lathe.machine_id))
        .await
        .unwrap();

    expect_report(coordinator(&store, &classifier).run().await.unwrap());

    let prediction = store
        .prediction_for_reading(reading.reading_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!prediction.is_failure);
    assert_eq!(prediction.failure_type, None);
    assert!((prediction.confidence_score - 0.95).abs() < f64::EPSILON);
    assert!(prediction
        .natural_language_reason
        .contains("operating normally"));
    // The type model is never consulted for a non-failure verdict.
    assert_eq!(classifier.type_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ambiguous_type_verdict_adds_a_caveat() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());

    let press = machine("MCH-008", "Press 8");
    store.add_machine(press.clone());
    let reading = store
        .insert_reading(nominal_reading(press.machine_id))
        .await
        .unwrap();
    classifier.predict_ambiguous_failure(reading.reading_id, "Power Failure");

    expect_report(coordinator(&store, &classifier).run().await.unwrap());

    let prediction = store
        .prediction_for_reading(reading.reading_id)
        .await
        .unwrap()
        .unwrap();
    assert!(prediction.natural_language_reason.contains("ambiguous"));
}

#[tokio::test]
async fn overlapping_trigger_reports_already_running() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());
    classifier.set_latency(Duration::from_millis(150));

    let mill = machine("MCH-009", "Mill 9");
    store.add_machine(mill.clone());
    store
        .insert_reading(nominal_reading(mill.machine_id))
        .await
        .unwrap();

    let coordinator = coordinator(&store, &classifier);

    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.run().await })
    };

    // Give the first run time to pass preflight and enter the batch.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(coordinator.is_running());

    let second = coordinator.run().await.unwrap();
    assert!(matches!(second, BatchRunOutcome::AlreadyRunning));

    let first = expect_report(background.await.unwrap().unwrap());
    assert_eq!(first.total, 1);
    assert!(!coordinator.is_running());

    // Once the first run finished, triggering again works.
    let third = coordinator.run().await.unwrap();
    assert!(matches!(third, BatchRunOutcome::Completed(_)));
}

#[tokio::test]
async fn storage_write_failure_is_contained_to_the_item() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(MockClassifier::healthy());

    let grinder = machine("MCH-010", "Grinder 10");
    store.add_machine(grinder.clone());
    let reading = store
        .insert_reading(nominal_reading(grinder.machine_id))
        .await
        .unwrap();

    store.set_fail_writes(true);
    let report = expect_report(coordinator(&store, &classifier).run().await.unwrap());
    store.set_fail_writes(false);

    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 1);
    assert!(!store.reading(reading.reading_id).unwrap().is_processed);
    assert_eq!(store.prediction_count(), 0);
}
