//! Per-record results of a batch operation
//!
//! Batches are not atomic. A [`BatchReport`] says, for every planned call,
//! whether it was applied, failed, or never attempted, so callers can recover
//! from a partial failure without re-reading the zone.

use crate::error::{Error, Result};
use crate::record::ResourceRecord;

use super::plan::{Action, PlannedOp};

/// What happened to one planned call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The provider confirmed the call
    Applied,
    /// The provider call failed with this message
    Failed(String),
    /// Not issued because an earlier call failed or the batch was cancelled
    NotAttempted,
}

/// Result of one planned call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Call that was planned
    pub action: Action,
    /// The record, with its ID populated when the call was applied
    pub record: ResourceRecord,
    /// What happened
    pub status: OutcomeStatus,
}

impl RecordOutcome {
    pub(crate) fn applied(action: Action, record: ResourceRecord) -> Self {
        Self {
            action,
            record,
            status: OutcomeStatus::Applied,
        }
    }

    pub(crate) fn failed(op: PlannedOp, error: &Error) -> Self {
        Self {
            action: op.action,
            record: op.record,
            status: OutcomeStatus::Failed(error.to_string()),
        }
    }

    pub(crate) fn not_attempted(op: PlannedOp) -> Self {
        Self {
            action: op.action,
            record: op.record,
            status: OutcomeStatus::NotAttempted,
        }
    }

    /// Whether the provider confirmed this call
    pub fn is_applied(&self) -> bool {
        self.status == OutcomeStatus::Applied
    }
}

/// Ordered outcomes of one append, set or delete
#[derive(Debug)]
pub struct BatchReport {
    operation: &'static str,
    outcomes: Vec<RecordOutcome>,
    error: Option<Error>,
}

impl BatchReport {
    pub(crate) fn new(
        operation: &'static str,
        outcomes: Vec<RecordOutcome>,
        error: Option<Error>,
    ) -> Self {
        Self {
            operation,
            outcomes,
            error,
        }
    }

    /// Operation name (`append`, `set`, `delete`)
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Every outcome, in plan order
    pub fn outcomes(&self) -> &[RecordOutcome] {
        &self.outcomes
    }

    /// The error that stopped the batch, if any
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Whether every planned call was applied
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Records the provider confirmed, in plan order
    pub fn applied(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.outcomes
            .iter()
            .filter(|o| o.is_applied())
            .map(|o| &o.record)
    }

    /// Records that failed or were never attempted, in plan order
    pub fn not_applied(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_applied())
            .map(|o| &o.record)
    }

    /// Collapse into the applied records, or an error
    ///
    /// When nothing was applied the original error is returned unchanged;
    /// otherwise it is wrapped in [`Error::PartialFailure`].
    pub fn into_result(self) -> Result<Vec<ResourceRecord>> {
        let Some(error) = self.error else {
            return Ok(self.outcomes.into_iter().map(|o| o.record).collect());
        };

        let (applied, not_applied): (Vec<_>, Vec<_>) =
            self.outcomes.into_iter().partition(RecordOutcome::is_applied);

        if applied.is_empty() {
            return Err(error);
        }

        Err(Error::PartialFailure {
            operation: self.operation,
            applied: applied.into_iter().map(|o| o.record).collect(),
            not_applied: not_applied.into_iter().map(|o| o.record).collect(),
            source: Box::new(error),
        })
    }
}
