// # zonekit-core
//
// Core library for zonekit: provider-agnostic DNS record management.
//
// ## Architecture Overview
//
// - **ResourceRecord**: Provider-agnostic record (name, type, data, TTL, optional ID)
// - **ZoneApi**: Trait for a provider's list/create/update/delete primitives
// - **Reconciler**: Turns append/set/delete intents into ZoneApi calls,
//   matching records without an ID by (name, type)
// - **RecordManager**: The get/append/set/delete interface the Reconciler offers
// - **ProviderRegistry**: Plugin-based registry for zone API factories
//
// ## Design Principles
//
// 1. **Provider as source of truth**: The reconciler reads a snapshot, never caches zone state
// 2. **Sequential calls**: One provider call at a time, cancellation checked between calls
// 3. **Non-atomic batches**: Per-record outcomes instead of a single pass/fail
// 4. **Library-First**: All functionality can be used as a library

pub mod cancel;
pub mod config;
pub mod error;
pub mod memory;
pub mod reconciler;
pub mod record;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use cancel::{CancelHandle, CancelSignal};
pub use config::{ClientConfig, MatchPolicy, ProviderConfig, ReconcilerConfig};
pub use error::{Error, Result};
pub use memory::MemoryZoneApi;
pub use reconciler::{Action, BatchReport, OutcomeStatus, PlannedOp, RecordOutcome, Reconciler};
pub use record::{MatchKey, RecordId, RecordType, ResourceRecord};
pub use registry::ProviderRegistry;
pub use traits::{RecordManager, ZoneApi, ZoneApiFactory};
