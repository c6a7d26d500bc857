// # Zone API Trait
//
// Defines the interface to a DNS provider's record API.
//
// ## Implementations
//
// - netcup: `zonekit-provider-netcup` crate
// - In-memory: `zonekit_core::memory::MemoryZoneApi`
//
// ## Usage
//
// ```rust,ignore
// use zonekit_core::{CancelSignal, ResourceRecord, ZoneApi};
// use zonekit_core::record::RecordType;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let api = /* ZoneApi implementation */;
//     let cancel = CancelSignal::never();
//
//     let record = ResourceRecord::new("test", RecordType::Txt, "hello");
//     let id = api.create_record("example.com", &record, &cancel).await?;
//     api.delete_record("example.com", &id, &cancel).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::cancel::CancelSignal;
use crate::record::{RecordId, ResourceRecord};

/// Trait for DNS provider record APIs
///
/// One method per provider primitive. The reconciler composes them; an
/// implementation never decides whether a record should be created or
/// updated.
///
/// # Provider Contract
///
/// - One logical provider operation per call
/// - No retry or backoff; return the error and let the caller decide
/// - No caching of zone state between calls
/// - Honour `cancel` for in-flight requests where the transport allows it,
///   returning [`crate::Error::Cancelled`]
/// - Never log credentials
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// List every record of `zone` in provider order, IDs populated
    ///
    /// # Errors
    ///
    /// - [`crate::Error::ZoneNotFound`] if the zone is unknown
    /// - [`crate::Error::Provider`] on transport or response failures
    async fn list_records(
        &self,
        zone: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>, crate::Error>;

    /// Create `record` and return the identifier the provider assigned
    ///
    /// `record.id` is ignored.
    async fn create_record(
        &self,
        zone: &str,
        record: &ResourceRecord,
        cancel: &CancelSignal,
    ) -> Result<RecordId, crate::Error>;

    /// Replace the record identified by `id` with `record`
    ///
    /// # Errors
    ///
    /// - [`crate::Error::RecordNotFound`] if `id` does not exist in the zone
    async fn update_record(
        &self,
        zone: &str,
        id: &RecordId,
        record: &ResourceRecord,
        cancel: &CancelSignal,
    ) -> Result<(), crate::Error>;

    /// Delete the record identified by `id`
    ///
    /// # Errors
    ///
    /// - [`crate::Error::RecordNotFound`] if `id` does not exist in the zone
    async fn delete_record(
        &self,
        zone: &str,
        id: &RecordId,
        cancel: &CancelSignal,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing zone APIs from configuration
pub trait ZoneApiFactory: Send + Sync {
    /// Create a ZoneApi instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn ZoneApi>, crate::Error>;
}
