//! Test doubles and common utilities for reconciler contract tests
//!
//! [`RecordingZoneApi`] wraps a [`MemoryZoneApi`] and records every call, so
//! tests can assert exactly which provider calls a reconciler issued.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zonekit_core::error::Result;
use zonekit_core::{
    CancelHandle, CancelSignal, Error, MemoryZoneApi, RecordId, RecordType, ReconcilerConfig,
    Reconciler, ResourceRecord, ZoneApi,
};

pub const ZONE: &str = "example.com";

/// A provider call as seen by the zone API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(ResourceRecord),
    Update(RecordId, ResourceRecord),
    Delete(RecordId),
}

/// A zone API that records calls and can inject failures
#[derive(Clone)]
pub struct RecordingZoneApi {
    inner: MemoryZoneApi,
    calls: Arc<Mutex<Vec<Call>>>,
    write_count: Arc<AtomicUsize>,
    /// Fail the n-th write call (1-based)
    fail_on_write: Arc<Mutex<Option<usize>>>,
    /// Fire this handle once the n-th write completed
    cancel_after_write: Arc<Mutex<Option<(usize, Arc<CancelHandle>)>>>,
}

impl RecordingZoneApi {
    pub fn new(inner: MemoryZoneApi) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
            write_count: Arc::new(AtomicUsize::new(0)),
            fail_on_write: Arc::new(Mutex::new(None)),
            cancel_after_write: Arc::new(Mutex::new(None)),
        }
    }

    /// Every call issued so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than `List`
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List))
            .collect()
    }

    /// Forget recorded calls (e.g. after fixture setup)
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
        self.write_count.store(0, Ordering::SeqCst);
    }

    /// Make the n-th write call (1-based, counted from the last reset) fail
    pub fn fail_on_write(&self, n: usize) {
        *self.fail_on_write.lock().unwrap() = Some(n);
    }

    /// Cancel `handle` right after the n-th write call completed
    pub fn cancel_after_write(&self, n: usize, handle: CancelHandle) {
        *self.cancel_after_write.lock().unwrap() = Some((n, Arc::new(handle)));
    }

    fn begin_write(&self, call: Call) -> Result<usize> {
        self.calls.lock().unwrap().push(call);
        let n = self.write_count.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_on_write.lock().unwrap() == Some(n) {
            return Err(Error::provider("recording", format!("injected failure on write {}", n)));
        }
        Ok(n)
    }

    fn end_write(&self, n: usize) {
        if let Some((at, handle)) = self.cancel_after_write.lock().unwrap().as_ref()
            && *at == n
        {
            handle.cancel();
        }
    }
}

#[async_trait::async_trait]
impl ZoneApi for RecordingZoneApi {
    async fn list_records(&self, zone: &str, cancel: &CancelSignal) -> Result<Vec<ResourceRecord>> {
        self.calls.lock().unwrap().push(Call::List);
        self.inner.list_records(zone, cancel).await
    }

    async fn create_record(
        &self,
        zone: &str,
        record: &ResourceRecord,
        cancel: &CancelSignal,
    ) -> Result<RecordId> {
        let n = self.begin_write(Call::Create(record.clone()))?;
        let id = self.inner.create_record(zone, record, cancel).await?;
        self.end_write(n);
        Ok(id)
    }

    async fn update_record(
        &self,
        zone: &str,
        id: &RecordId,
        record: &ResourceRecord,
        cancel: &CancelSignal,
    ) -> Result<()> {
        let n = self.begin_write(Call::Update(id.clone(), record.clone()))?;
        self.inner.update_record(zone, id, record, cancel).await?;
        self.end_write(n);
        Ok(())
    }

    async fn delete_record(&self, zone: &str, id: &RecordId, cancel: &CancelSignal) -> Result<()> {
        let n = self.begin_write(Call::Delete(id.clone()))?;
        self.inner.delete_record(zone, id, cancel).await?;
        self.end_write(n);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// A TXT record without ID or TTL
pub fn txt(name: &str, data: &str) -> ResourceRecord {
    ResourceRecord::new(name, RecordType::Txt, data)
}

/// A reconciler over an empty [`ZONE`], plus the recording API behind it
pub async fn fixture() -> (Reconciler, RecordingZoneApi) {
    fixture_with(Vec::new(), ReconcilerConfig::default()).await
}

/// A reconciler over [`ZONE`] seeded with `records`
pub async fn fixture_with(
    records: Vec<ResourceRecord>,
    config: ReconcilerConfig,
) -> (Reconciler, RecordingZoneApi) {
    let memory = MemoryZoneApi::new();
    memory.insert_zone(ZONE, records).await;

    let api = RecordingZoneApi::new(memory);
    let reconciler = Reconciler::new(Box::new(api.clone()), config);
    (reconciler, api)
}
