//! Contract Test: Set Matching
//!
//! Constraints verified:
//! - A record without ID updates the current record sharing its (name, type)
//! - A record without ID that matches nothing is created
//! - A record with ID is updated by that ID without consulting names
//! - Updates keep (name, type) and replace data
//! - Duplicate (name, type) candidates resolve to provider order (FirstMatch)
//!   or are refused (Strict) before any write
//!
//! If this test fails, set has changed how it correlates records.

mod common;

use common::*;
use zonekit_core::{
    CancelSignal, Error, MatchPolicy, RecordId, RecordManager, RecordType, ReconcilerConfig,
    ResourceRecord,
};

fn strict() -> ReconcilerConfig {
    ReconcilerConfig {
        match_policy: MatchPolicy::Strict,
    }
}

#[tokio::test]
async fn set_without_id_updates_the_single_match() {
    let (reconciler, api) = fixture_with(
        vec![txt("test", "testval1"), txt("other", "x")],
        ReconcilerConfig::default(),
    )
    .await;
    let before = reconciler
        .get_records(ZONE, &CancelSignal::never())
        .await
        .unwrap();
    let target = before[0].id.clone().unwrap();
    api.reset_calls();

    let result = reconciler
        .set_records(ZONE, &[txt("test", "testval1edit")], &CancelSignal::never())
        .await
        .expect("set succeeds");

    assert_eq!(
        api.writes(),
        vec![Call::Update(target.clone(), txt("test", "testval1edit").with_id(target.clone()))]
    );
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id.as_ref(), Some(&target));
    assert!(result[0].identity_eq(&before[0]));
    assert_eq!(result[0].data, "testval1edit");
}

#[tokio::test]
async fn set_without_match_creates() {
    let (reconciler, api) = fixture_with(vec![txt("test", "v")], ReconcilerConfig::default()).await;

    let desired = ResourceRecord::new("test", RecordType::Cname, "target.example.com");
    let result = reconciler
        .set_records(ZONE, &[desired.clone()], &CancelSignal::never())
        .await
        .expect("set succeeds");

    assert_eq!(api.writes(), vec![Call::Create(desired)]);
    assert!(result[0].id.is_some());
    assert_eq!(
        reconciler.api().list_records(ZONE, &CancelSignal::never()).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn set_with_id_trusts_the_caller() {
    let (reconciler, api) = fixture_with(vec![txt("old-name", "v")], ReconcilerConfig::default()).await;
    let current = reconciler.get_records(ZONE, &CancelSignal::never()).await.unwrap();
    let id = current[0].id.clone().unwrap();

    let renamed = txt("new-name", "v2").with_id(id.clone());
    reconciler
        .set_records(ZONE, &[renamed.clone()], &CancelSignal::never())
        .await
        .expect("set succeeds");

    assert_eq!(api.writes(), vec![Call::Update(id, renamed.clone())]);
    let after = reconciler.get_records(ZONE, &CancelSignal::never()).await.unwrap();
    assert_eq!(after, vec![renamed]);
}

#[tokio::test]
async fn set_with_unknown_id_fails_with_record_not_found() {
    let (reconciler, _api) = fixture().await;

    let err = reconciler
        .set_records(ZONE, &[txt("test", "v").with_id("does-not-exist")], &CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RecordNotFound(_)), "got {err}");
}

#[tokio::test]
async fn set_duplicates_resolve_in_provider_order() {
    // Known limitation, kept deterministic: the first unclaimed candidate wins.
    let (reconciler, api) = fixture_with(
        vec![txt("test", "first"), txt("test", "second")],
        ReconcilerConfig::default(),
    )
    .await;
    let current = reconciler.get_records(ZONE, &CancelSignal::never()).await.unwrap();
    let first = current[0].id.clone().unwrap();
    let second = current[1].id.clone().unwrap();
    api.reset_calls();

    reconciler
        .set_records(ZONE, &[txt("test", "x"), txt("test", "y")], &CancelSignal::never())
        .await
        .expect("set succeeds");

    let targets: Vec<RecordId> = api
        .writes()
        .into_iter()
        .filter_map(|c| match c {
            Call::Update(id, _) => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(targets, vec![first, second]);
}

#[tokio::test]
async fn strict_policy_refuses_ambiguous_matches_before_writing() {
    let (reconciler, api) = fixture_with(vec![txt("test", "a"), txt("test", "b")], strict()).await;

    let err = reconciler
        .set_records(ZONE, &[txt("other", "ok"), txt("test", "x")], &CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AmbiguousMatch { candidates: 2, .. }), "got {err}");
    assert!(api.writes().is_empty(), "no write may precede a planning error");
}

#[tokio::test]
async fn preview_set_plans_without_writing() {
    let (reconciler, api) = fixture_with(vec![txt("test", "a")], ReconcilerConfig::default()).await;

    let plan = reconciler
        .preview_set(ZONE, &[txt("test", "b"), txt("new", "c")], &CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].action, zonekit_core::Action::Update);
    assert_eq!(plan[1].action, zonekit_core::Action::Create);
    assert!(api.writes().is_empty());
}
