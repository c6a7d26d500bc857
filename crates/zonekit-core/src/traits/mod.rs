//! Core traits for zonekit
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ZoneApi`]: Provider primitives (list, create, update, delete)
//! - [`RecordManager`]: Record CRUD offered to applications

pub mod record_manager;
pub mod zone_api;

pub use record_manager::RecordManager;
pub use zone_api::{ZoneApi, ZoneApiFactory};
