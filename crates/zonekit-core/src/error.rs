//! Error types for zonekit
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

use crate::record::ResourceRecord;

/// Result type alias for zonekit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zonekit
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, malformed response or any other provider-side failure
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Authentication against the provider failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The zone does not exist on the provider
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// A record could not be resolved to an existing provider record
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// More than one current record shares the requested (name, type)
    #[error("Ambiguous match for {name} {record_type}: {candidates} candidate records")]
    AmbiguousMatch {
        /// Record name
        name: String,
        /// Record type mnemonic
        record_type: String,
        /// Number of current records sharing the key
        candidates: usize,
    },

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Some records of a batch were applied before a record failed
    #[error("{operation} partially applied: {} applied [{}], {} not applied [{}]: {source}",
        .applied.len(), describe(.applied), .not_applied.len(), describe(.not_applied))]
    PartialFailure {
        /// Batch operation name (append, set, delete)
        operation: &'static str,
        /// Records applied before the failure, with IDs populated
        applied: Vec<ResourceRecord>,
        /// The failing record followed by every record never attempted
        not_applied: Vec<ResourceRecord>,
        /// The error raised by the failing record
        #[source]
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe(records: &[ResourceRecord]) -> String {
    records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a "zone not found" error
    pub fn zone_not_found(zone: impl Into<String>) -> Self {
        Self::ZoneNotFound(zone.into())
    }

    /// Create a "record not found" error
    pub fn record_not_found(msg: impl Into<String>) -> Self {
        Self::RecordNotFound(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// The error that actually stopped the operation.
    ///
    /// Unwraps [`Error::PartialFailure`]; returns `self` for every other variant.
    pub fn root(&self) -> &Error {
        match self {
            Self::PartialFailure { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the operation stopped because the caller cancelled it
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled)
    }
}
