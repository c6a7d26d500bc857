//! Record reconciler
//!
//! The Reconciler is responsible for:
//! - Fetching the zone snapshot a set or delete is planned against
//! - Planning provider calls (see [`plan`])
//! - Issuing the calls one at a time, checking for cancellation before each
//! - Merging provider-assigned IDs back into the caller's records
//!
//! ## Flow
//!
//! ```text
//! caller ──► Reconciler ──► plan ──► ZoneApi (sequential) ──► BatchReport ──► caller
//!                 ▲                                                │
//!                 └──────────── list_records (snapshot) ◄──────────┘
//! ```
//!
//! The snapshot is read once per operation and never re-validated. Calls
//! already completed are never rolled back.

pub mod plan;
pub mod report;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::cancel::CancelSignal;
use crate::config::ReconcilerConfig;
use crate::error::{Error, Result};
use crate::record::ResourceRecord;
use crate::traits::{RecordManager, ZoneApi};

pub use plan::{Action, PlannedOp};
pub use report::{BatchReport, OutcomeStatus, RecordOutcome};

/// Translates record intents into provider calls
///
/// Owns no zone state; the provider is the only source of truth.
pub struct Reconciler {
    api: Box<dyn ZoneApi>,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a reconciler over `api`
    pub fn new(api: Box<dyn ZoneApi>, config: ReconcilerConfig) -> Self {
        Self { api, config }
    }

    /// The underlying zone API
    pub fn api(&self) -> &dyn ZoneApi {
        self.api.as_ref()
    }

    /// Reconciler settings
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Fetch the current zone snapshot
    pub async fn snapshot(&self, zone: &str, cancel: &CancelSignal) -> Result<Vec<ResourceRecord>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let records = self.api.list_records(zone, cancel).await?;
        debug!(
            "Fetched {} record(s) for zone {} from {}",
            records.len(),
            zone,
            self.api.provider_name()
        );
        Ok(records)
    }

    /// Plan a set without issuing any write
    pub async fn preview_set(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<Vec<PlannedOp>> {
        let current = self.snapshot(zone, cancel).await?;
        plan::plan_set(records, &current, self.config.match_policy)
    }

    /// Plan a delete without issuing any write
    pub async fn preview_delete(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<Vec<PlannedOp>> {
        let current = self.snapshot(zone, cancel).await?;
        plan::plan_delete(records, &current, self.config.match_policy)
    }

    /// Append with per-record outcomes
    ///
    /// `Err` only when nothing could be planned; call failures are in the report.
    pub async fn append_with_report(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<BatchReport> {
        let ops = plan::plan_append(records);
        Ok(self.execute("append", zone, ops, cancel).await)
    }

    /// Set with per-record outcomes
    pub async fn set_with_report(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<BatchReport> {
        let ops = self.preview_set(zone, records, cancel).await?;
        Ok(self.execute("set", zone, ops, cancel).await)
    }

    /// Delete with per-record outcomes
    pub async fn delete_with_report(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<BatchReport> {
        let ops = self.preview_delete(zone, records, cancel).await?;
        Ok(self.execute("delete", zone, ops, cancel).await)
    }

    async fn execute(
        &self,
        operation: &'static str,
        zone: &str,
        ops: Vec<PlannedOp>,
        cancel: &CancelSignal,
    ) -> BatchReport {
        info!(
            "Applying {} to zone {}: {} call(s) via {}",
            operation,
            zone,
            ops.len(),
            self.api.provider_name()
        );

        let mut outcomes = Vec::with_capacity(ops.len());
        let mut error = None;
        let mut pending = ops.into_iter();

        for op in pending.by_ref() {
            if cancel.is_cancelled() {
                info!("{} on zone {} cancelled before {}", operation, zone, op);
                outcomes.push(RecordOutcome::not_attempted(op));
                error = Some(Error::Cancelled);
                break;
            }

            debug!("{}: {}", operation, op);
            match self.apply(zone, &op, cancel).await {
                Ok(record) => outcomes.push(RecordOutcome::applied(op.action, record)),
                Err(e) => {
                    warn!("{} on zone {} failed at {}: {}", operation, zone, op, e);
                    outcomes.push(RecordOutcome::failed(op, &e));
                    error = Some(e);
                    break;
                }
            }
        }

        outcomes.extend(pending.map(RecordOutcome::not_attempted));

        let report = BatchReport::new(operation, outcomes, error);
        if report.is_complete() {
            info!(
                "{} on zone {} complete: {} record(s)",
                operation,
                zone,
                report.outcomes().len()
            );
        }
        report
    }

    async fn apply(
        &self,
        zone: &str,
        op: &PlannedOp,
        cancel: &CancelSignal,
    ) -> Result<ResourceRecord> {
        match op.action {
            Action::Create => {
                let id = self.api.create_record(zone, &op.record, cancel).await?;
                Ok(op.record.clone().with_id(id))
            }
            Action::Update => {
                let id = target(op)?;
                self.api.update_record(zone, id, &op.record, cancel).await?;
                Ok(op.record.clone())
            }
            Action::Delete => {
                let id = target(op)?;
                self.api.delete_record(zone, id, cancel).await?;
                Ok(op.record.clone())
            }
        }
    }
}

fn target(op: &PlannedOp) -> Result<&crate::record::RecordId> {
    op.target()
        .ok_or_else(|| Error::invalid_input(format!("{} has no target ID", op)))
}

#[async_trait]
impl RecordManager for Reconciler {
    async fn get_records(&self, zone: &str, cancel: &CancelSignal) -> Result<Vec<ResourceRecord>> {
        self.snapshot(zone, cancel).await
    }

    async fn append_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>> {
        self.append_with_report(zone, records, cancel)
            .await?
            .into_result()
    }

    async fn set_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>> {
        self.set_with_report(zone, records, cancel)
            .await?
            .into_result()
    }

    async fn delete_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>> {
        self.delete_with_report(zone, records, cancel)
            .await?
            .into_result()
    }
}
