//! Contract Test: Append Semantics
//!
//! Constraints verified:
//! - Appending N records issues exactly N create calls
//! - Existing records with the same (name, type) never turn a create into an update
//! - Results mirror input order and carry provider-assigned IDs
//! - Appended records round-trip through get_records
//!
//! If this test fails, append has started reconciling against zone state.

mod common;

use common::*;
use std::time::Duration;
use zonekit_core::{CancelSignal, RecordManager, RecordType, ReconcilerConfig, ResourceRecord};

#[tokio::test]
async fn append_issues_one_create_per_record() {
    let (reconciler, api) = fixture().await;
    let records = vec![txt("a", "1"), txt("b", "2"), txt("c", "3")];

    let appended = reconciler
        .append_records(ZONE, &records, &CancelSignal::never())
        .await
        .expect("append succeeds");

    let writes = api.writes();
    assert_eq!(writes.len(), 3, "Expected 3 creates, got {:?}", writes);
    assert!(writes.iter().all(|c| matches!(c, Call::Create(_))));

    // Append never needs the snapshot
    assert!(!api.calls().contains(&Call::List));

    let names: Vec<_> = appended.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert!(appended.iter().all(|r| r.id.is_some()));
}

#[tokio::test]
async fn append_creates_even_when_name_and_type_exist() {
    let existing = txt("test", "testval1");
    let (reconciler, api) = fixture_with(vec![existing.clone()], ReconcilerConfig::default()).await;

    let appended = reconciler
        .append_records(ZONE, &[existing.clone()], &CancelSignal::never())
        .await
        .expect("append succeeds");

    assert!(matches!(api.writes().as_slice(), [Call::Create(_)]));

    let current = reconciler
        .get_records(ZONE, &CancelSignal::never())
        .await
        .expect("get succeeds");
    let copies = current.iter().filter(|r| r.full_eq(&existing)).count();
    assert_eq!(copies, 2, "TXT records may share a name; append must add a second one");
    assert_ne!(current[0].id, appended[0].id);
}

#[tokio::test]
async fn append_ignores_caller_supplied_ids() {
    let (reconciler, api) = fixture().await;
    let record = txt("test", "v").with_id("caller-made-this-up");

    let appended = reconciler
        .append_records(ZONE, &[record], &CancelSignal::never())
        .await
        .expect("append succeeds");

    match api.writes().as_slice() {
        [Call::Create(sent)] => assert!(sent.id.is_none()),
        other => panic!("unexpected calls: {:?}", other),
    }
    assert_ne!(appended[0].id.as_ref().map(|id| id.as_str()), Some("caller-made-this-up"));
}

#[tokio::test]
async fn appended_records_round_trip_through_get() {
    let (reconciler, _api) = fixture().await;
    let records = vec![
        txt("test", "testval1"),
        ResourceRecord::new("www", RecordType::A, "192.0.2.10").with_ttl(Duration::from_secs(300)),
        ResourceRecord::new("@", RecordType::Mx, "10 mail.example.com"),
    ];

    let appended = reconciler
        .append_records(ZONE, &records, &CancelSignal::never())
        .await
        .expect("append succeeds");
    let current = reconciler
        .get_records(ZONE, &CancelSignal::never())
        .await
        .expect("get succeeds");

    assert!(current.len() >= appended.len());
    for (original, created) in records.iter().zip(&appended) {
        assert!(created.full_eq(original), "{} should equal {}", created, original);
        let found = current
            .iter()
            .find(|r| r.id == created.id)
            .unwrap_or_else(|| panic!("Record {} not found", created));
        assert!(found.full_eq(original));
    }
}
