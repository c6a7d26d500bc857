// # Memory Zone API
//
// In-memory implementation of ZoneApi.
//
// ## Purpose
//
// Holds zones as ordered record lists behind a RwLock. Useful for tests,
// for embedding zonekit without a provider account, and for previewing
// reconciliation plans.
//
// ## Behavior
//
// - IDs are sequential integers, unique across all zones of one instance
// - Records keep insertion order, which is the "provider order" for matching
// - Per-record TTLs are stored as given
// - Zone names compare case-insensitively, with or without a trailing dot

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::cancel::CancelSignal;
use crate::config::ProviderConfig;
use crate::record::{RecordId, ResourceRecord};
use crate::traits::{ZoneApi, ZoneApiFactory};
use crate::Error;

#[derive(Debug, Default)]
struct Inner {
    zones: HashMap<String, Vec<ResourceRecord>>,
    next_id: u64,
}

impl Inner {
    fn zone_mut(&mut self, zone: &str) -> Result<&mut Vec<ResourceRecord>, Error> {
        self.zones
            .get_mut(&zone_key(zone))
            .ok_or_else(|| Error::zone_not_found(zone))
    }

    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::new(self.next_id.to_string())
    }
}

fn zone_key(zone: &str) -> String {
    zone.trim_end_matches('.').to_ascii_lowercase()
}

/// In-memory zone API
///
/// Clones share the same zones.
///
/// # Example
///
/// ```rust,no_run
/// use zonekit_core::{CancelSignal, MemoryZoneApi, ResourceRecord, ZoneApi};
/// use zonekit_core::record::RecordType;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = MemoryZoneApi::new();
///     api.insert_zone("example.com", Vec::new()).await;
///
///     let cancel = CancelSignal::never();
///     let record = ResourceRecord::new("www", RecordType::A, "192.0.2.1");
///     let id = api.create_record("example.com", &record, &cancel).await?;
///
///     let records = api.list_records("example.com", &cancel).await?;
///     assert_eq!(records[0].id.as_ref(), Some(&id));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryZoneApi {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryZoneApi {
    /// Create an instance without zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance holding each of `zones`, empty
    pub fn with_zones<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let inner = Inner {
            zones: zones
                .into_iter()
                .map(|zone| (zone_key(zone.as_ref()), Vec::new()))
                .collect(),
            next_id: 0,
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Create or replace `zone` with `records`
    ///
    /// Records without an ID are assigned one.
    pub async fn insert_zone(&self, zone: &str, records: Vec<ResourceRecord>) {
        let mut guard = self.inner.write().await;
        let records: Vec<_> = records
            .into_iter()
            .map(|mut record| {
                if record.id.is_none() {
                    record.id = Some(guard.allocate_id());
                }
                record
            })
            .collect();
        guard.zones.insert(zone_key(zone), records);
    }

    /// Remove `zone` and all its records
    pub async fn remove_zone(&self, zone: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.zones.remove(&zone_key(zone)).is_some()
    }

    /// Number of records in `zone`, if it exists
    pub async fn record_count(&self, zone: &str) -> Option<usize> {
        let guard = self.inner.read().await;
        guard.zones.get(&zone_key(zone)).map(Vec::len)
    }
}

#[async_trait]
impl ZoneApi for MemoryZoneApi {
    async fn list_records(
        &self,
        zone: &str,
        _cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>, Error> {
        let guard = self.inner.read().await;
        guard
            .zones
            .get(&zone_key(zone))
            .cloned()
            .ok_or_else(|| Error::zone_not_found(zone))
    }

    async fn create_record(
        &self,
        zone: &str,
        record: &ResourceRecord,
        _cancel: &CancelSignal,
    ) -> Result<RecordId, Error> {
        let mut guard = self.inner.write().await;
        // Reject before allocating so failed calls do not burn IDs
        guard.zone_mut(zone)?;
        let id = guard.allocate_id();
        guard
            .zone_mut(zone)?
            .push(record.clone().with_id(id.clone()));
        Ok(id)
    }

    async fn update_record(
        &self,
        zone: &str,
        id: &RecordId,
        record: &ResourceRecord,
        _cancel: &CancelSignal,
    ) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        let existing = guard
            .zone_mut(zone)?
            .iter_mut()
            .find(|r| r.id.as_ref() == Some(id))
            .ok_or_else(|| Error::record_not_found(format!("no record with ID {} in {}", id, zone)))?;

        *existing = record.clone().with_id(id.clone());
        Ok(())
    }

    async fn delete_record(
        &self,
        zone: &str,
        id: &RecordId,
        _cancel: &CancelSignal,
    ) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        let records = guard.zone_mut(zone)?;
        let position = records
            .iter()
            .position(|r| r.id.as_ref() == Some(id))
            .ok_or_else(|| Error::record_not_found(format!("no record with ID {} in {}", id, zone)))?;

        records.remove(position);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for [`MemoryZoneApi`]
pub struct MemoryFactory;

impl ZoneApiFactory for MemoryFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneApi>, Error> {
        match config {
            ProviderConfig::Memory { zones } => Ok(Box::new(MemoryZoneApi::with_zones(zones))),
            _ => Err(Error::config("Invalid config for memory provider")),
        }
    }
}
