//! Operation planning
//!
//! Pure functions that turn desired records plus a zone snapshot into the
//! ordered list of provider calls. Nothing here performs I/O.
//!
//! ## Matching
//!
//! A record without an ID is matched by its [`MatchKey`] against the snapshot.
//! Each current record can be claimed at most once per pass, and records that
//! carry an explicit ID claim their target before any key matching happens.
//! When several unclaimed candidates remain, [`MatchPolicy::FirstMatch`] takes
//! the first in provider order and [`MatchPolicy::Strict`] refuses.

use std::collections::HashSet;
use std::fmt;

use crate::config::MatchPolicy;
use crate::error::{Error, Result};
use crate::record::{MatchKey, RecordId, ResourceRecord};

/// Kind of provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `create_record`
    Create,
    /// `update_record` against the record's ID
    Update,
    /// `delete_record` against the record's ID
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        })
    }
}

/// One provider call, in execution order
///
/// For updates and deletes `record.id` is the target identifier. For creates
/// it is always `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOp {
    /// Call to issue
    pub action: Action,
    /// Record to send (create, update) or echo back (delete)
    pub record: ResourceRecord,
}

impl PlannedOp {
    fn create(mut record: ResourceRecord) -> Self {
        record.id = None;
        Self {
            action: Action::Create,
            record,
        }
    }

    fn update(record: ResourceRecord) -> Self {
        Self {
            action: Action::Update,
            record,
        }
    }

    fn delete(record: ResourceRecord) -> Self {
        Self {
            action: Action::Delete,
            record,
        }
    }

    /// Target identifier of an update or delete
    pub fn target(&self) -> Option<&RecordId> {
        self.record.id.as_ref()
    }
}

impl fmt::Display for PlannedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.record)
    }
}

/// Plan an append: one create per record, input order, no matching
pub fn plan_append(desired: &[ResourceRecord]) -> Vec<PlannedOp> {
    desired.iter().cloned().map(PlannedOp::create).collect()
}

/// Plan a set against the `current` snapshot
///
/// Records with an ID become updates of that ID without consulting the
/// snapshot. Records without an ID update their first unclaimed `(name, type)`
/// match, or are created when nothing matches.
pub fn plan_set(
    desired: &[ResourceRecord],
    current: &[ResourceRecord],
    policy: MatchPolicy,
) -> Result<Vec<PlannedOp>> {
    let mut claimed: HashSet<RecordId> = desired.iter().filter_map(|r| r.id.clone()).collect();

    desired
        .iter()
        .map(|record| {
            if record.id.is_some() {
                return Ok(PlannedOp::update(record.clone()));
            }

            let key = record.match_key();
            let candidates = candidates(current, &key, &claimed);
            match pick(&key, candidates, policy)? {
                Some(id) => {
                    claimed.insert(id.clone());
                    Ok(PlannedOp::update(record.clone().with_id(id)))
                }
                None => Ok(PlannedOp::create(record.clone())),
            }
        })
        .collect()
}

/// Plan a delete against the `current` snapshot
///
/// Every record must resolve to an existing ID, or the whole plan fails with
/// [`Error::RecordNotFound`]. Among several `(name, type)` candidates, those
/// whose data equals the request's non-empty data are preferred.
pub fn plan_delete(
    requested: &[ResourceRecord],
    current: &[ResourceRecord],
    policy: MatchPolicy,
) -> Result<Vec<PlannedOp>> {
    // Explicit IDs claim their targets before any key matching
    let mut claimed: HashSet<RecordId> = HashSet::new();
    for record in requested {
        let Some(ref id) = record.id else {
            continue;
        };
        if !current.iter().any(|c| c.id.as_ref() == Some(id)) {
            return Err(Error::record_not_found(format!(
                "no record with ID {} ({})",
                id, record
            )));
        }
        if !claimed.insert(id.clone()) {
            return Err(Error::invalid_input(format!(
                "record ID {} listed more than once",
                id
            )));
        }
    }

    let mut ops = Vec::with_capacity(requested.len());
    for record in requested {
        if record.id.is_some() {
            ops.push(PlannedOp::delete(record.clone()));
            continue;
        }

        let key = record.match_key();
        let mut matches = candidates(current, &key, &claimed);
        if !record.data.is_empty() && matches.iter().any(|c| c.data == record.data) {
            matches.retain(|c| c.data == record.data);
        }

        let id = pick(&key, matches, policy)?.ok_or_else(|| {
            Error::record_not_found(format!("no record matches {} ({})", key, record))
        })?;
        claimed.insert(id.clone());
        ops.push(PlannedOp::delete(record.clone().with_id(id)));
    }

    Ok(ops)
}

fn candidates<'a>(
    current: &'a [ResourceRecord],
    key: &MatchKey,
    claimed: &HashSet<RecordId>,
) -> Vec<&'a ResourceRecord> {
    current
        .iter()
        .filter(|c| c.id.as_ref().is_some_and(|id| !claimed.contains(id)))
        .filter(|c| &c.match_key() == key)
        .collect()
}

fn pick(
    key: &MatchKey,
    candidates: Vec<&ResourceRecord>,
    policy: MatchPolicy,
) -> Result<Option<RecordId>> {
    if policy == MatchPolicy::Strict && candidates.len() > 1 {
        return Err(Error::AmbiguousMatch {
            name: key.name().to_string(),
            record_type: key.record_type().to_string(),
            candidates: candidates.len(),
        });
    }

    Ok(candidates.first().and_then(|c| c.id.clone()))
}
