// # Record Manager Trait
//
// The generic record-management interface consumed by applications:
// get / append / set / delete records within a zone.
//
// [`crate::Reconciler`] implements it on top of any [`crate::ZoneApi`].

use async_trait::async_trait;

use crate::cancel::CancelSignal;
use crate::record::ResourceRecord;

/// Record CRUD within a zone
///
/// Multi-record operations are not atomic: records applied before a failure
/// stay applied and are listed in [`crate::Error::PartialFailure`].
#[async_trait]
pub trait RecordManager: Send + Sync {
    /// Every record currently in `zone`, IDs populated, provider order
    async fn get_records(
        &self,
        zone: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>, crate::Error>;

    /// Create every record in `records`, even when a record with the same
    /// name and type already exists
    async fn append_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>, crate::Error>;

    /// Update records by ID, or by `(name, type)` when no ID is given,
    /// creating those that match nothing
    async fn set_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>, crate::Error>;

    /// Delete records by ID, or by `(name, type)` when no ID is given
    async fn delete_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>, crate::Error>;
}
