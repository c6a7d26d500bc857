//! Contract Test: Non-Atomic Batches & Cancellation
//!
//! Constraints verified:
//! - Calls are issued sequentially and stop at the first failure
//! - Records applied before a failure stay applied (no rollback)
//! - The error lists applied and not-applied records
//! - Cancellation takes effect before the next call, never undoing earlier ones
//!
//! If this test fails, batch error reporting or cancellation is broken.

mod common;

use common::*;
use zonekit_core::{
    CancelSignal, Error, OutcomeStatus, RecordManager, ReconcilerConfig, ResourceRecord,
};

fn names(records: &[ResourceRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn failure_mid_batch_reports_partial_progress() {
    let (reconciler, api) = fixture().await;
    api.fail_on_write(2);

    let err = reconciler
        .append_records(ZONE, &[txt("a", "1"), txt("b", "2"), txt("c", "3")], &CancelSignal::never())
        .await
        .unwrap_err();

    match err {
        Error::PartialFailure {
            operation,
            ref applied,
            ref not_applied,
            ref source,
        } => {
            assert_eq!(operation, "append");
            assert_eq!(names(applied), ["a"]);
            assert!(applied[0].id.is_some());
            assert_eq!(names(not_applied), ["b", "c"]);
            assert!(matches!(**source, Error::Provider { .. }));
        }
        ref other => panic!("unexpected error: {other}"),
    }

    // Two calls issued, the third never attempted
    assert_eq!(api.writes().len(), 2);

    // "a" is not rolled back
    let current = reconciler.get_records(ZONE, &CancelSignal::never()).await.unwrap();
    assert_eq!(names(&current), ["a"]);
}

#[tokio::test]
async fn failure_on_first_call_returns_the_provider_error() {
    let (reconciler, api) = fixture().await;
    api.fail_on_write(1);

    let err = reconciler
        .append_records(ZONE, &[txt("a", "1"), txt("b", "2")], &CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider { .. }), "got {err}");
    assert_eq!(api.writes().len(), 1);
}

#[tokio::test]
async fn report_marks_every_record() {
    let (reconciler, api) = fixture_with(vec![txt("test", "v")], ReconcilerConfig::default()).await;
    api.fail_on_write(2);

    let report = reconciler
        .set_with_report(
            ZONE,
            &[txt("test", "edit"), txt("new", "n"), txt("later", "l")],
            &CancelSignal::never(),
        )
        .await
        .expect("planning succeeds");

    let statuses: Vec<_> = report.outcomes().iter().map(|o| o.status.clone()).collect();
    assert_eq!(statuses[0], OutcomeStatus::Applied);
    assert!(matches!(statuses[1], OutcomeStatus::Failed(ref msg) if msg.contains("injected")));
    assert_eq!(statuses[2], OutcomeStatus::NotAttempted);
    assert!(!report.is_complete());
    assert_eq!(report.applied().count(), 1);
}

#[tokio::test]
async fn cancellation_stops_before_the_next_call() {
    let (reconciler, api) = fixture().await;
    let (handle, cancel) = CancelSignal::new();
    api.cancel_after_write(1, handle);

    let err = reconciler
        .append_records(ZONE, &[txt("a", "1"), txt("b", "2"), txt("c", "3")], &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "got {err}");
    match err {
        Error::PartialFailure { ref applied, ref not_applied, .. } => {
            assert_eq!(names(applied), ["a"]);
            assert_eq!(names(not_applied), ["b", "c"]);
        }
        ref other => panic!("unexpected error: {other}"),
    }

    assert_eq!(api.writes().len(), 1);
    let current = reconciler.get_records(ZONE, &CancelSignal::never()).await.unwrap();
    assert_eq!(names(&current), ["a"], "completed calls are not rolled back");
}

#[tokio::test]
async fn cancelled_signal_skips_the_snapshot() {
    let (reconciler, api) = fixture().await;
    let (handle, cancel) = CancelSignal::new();
    handle.cancel();

    let err = reconciler
        .set_records(ZONE, &[txt("a", "1")], &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(api.calls().is_empty());
}
