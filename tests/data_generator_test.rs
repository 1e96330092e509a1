//! Synthetic data generation: only ACTIVE machines get readings, and a
//! failing machine never stops the pass.

use failcast_core::constants::machine_status;
use failcast_core::orchestration::SyntheticDataGenerator;
use failcast_core::storage::{ReadingFilter, Storage};
use failcast_core::pagination::PageRequest;
use failcast_core::test_helpers::{machine, machine_with_status, InMemoryStore};
use std::sync::Arc;

#[tokio::test]
async fn generates_one_unprocessed_reading_per_active_machine() {
    let store = Arc::new(InMemoryStore::new());
    let lathe = machine("MCH-001", "Lathe 1");
    let press = machine("MCH-002", "Press 2");
    let retired = machine_with_status("MCH-003", "Mill 3", machine_status::DECOMMISSIONED);
    store.add_machine(lathe.clone());
    store.add_machine(press.clone());
    store.add_machine(retired.clone());

    let generator = SyntheticDataGenerator::new(store.clone());
    let report = generator.generate_for_all_machines().await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.successful, 2);
    assert_eq!(report.failed, 0);

    let pending = store
        .readings_page(ReadingFilter::unprocessed(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(pending.data.len(), 2);
    assert!(!pending
        .data
        .iter()
        .any(|r| r.machine_id == retired.machine_id));
}

#[tokio::test]
async fn empty_fleet_produces_empty_report() {
    let store = Arc::new(InMemoryStore::new());
    let generator = SyntheticDataGenerator::new(store);

    let report = generator.generate_for_all_machines().await.unwrap();

    assert_eq!(report.total, 0);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn write_failure_is_reported_per_machine() {
    let store = Arc::new(InMemoryStore::new());
    store.add_machine(machine("MCH-004", "Grinder 4"));
    store.set_fail_writes(true);

    let generator = SyntheticDataGenerator::new(store.clone());
    let report = generator.generate_for_all_machines().await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 1);
    assert!(report.results[0].error.is_some());
}
