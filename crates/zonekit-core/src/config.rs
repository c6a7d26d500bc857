//! Configuration types for zonekit
//!
//! Credentials travel inside [`ProviderConfig`] and are handed to the
//! provider constructor; nothing is read from process-wide state here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Provider configuration
    pub provider: ProviderConfig,

    /// Reconciliation settings
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
}

impl ClientConfig {
    /// Parse a JSON configuration document and validate it
    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        let config: ClientConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// netcup CCP DNS API
    Netcup {
        /// netcup customer number
        customer_number: String,
        /// API key from the customer control panel
        api_key: String,
        /// API password from the customer control panel
        api_password: String,
        /// Endpoint override (defaults to the public netcup endpoint)
        #[serde(default)]
        endpoint: Option<String>,
        /// HTTP timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// In-memory zones (tests and embedding)
    Memory {
        /// Zones created empty when the API is built
        #[serde(default)]
        zones: Vec<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// netcup configuration with the default endpoint and timeout
    pub fn netcup(
        customer_number: impl Into<String>,
        api_key: impl Into<String>,
        api_password: impl Into<String>,
    ) -> Self {
        ProviderConfig::Netcup {
            customer_number: customer_number.into(),
            api_key: api_key.into(),
            api_password: api_password.into(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Netcup {
                customer_number,
                api_key,
                api_password,
                endpoint,
                timeout_secs,
            } => {
                if customer_number.is_empty() {
                    return Err(crate::Error::config("netcup customer number cannot be empty"));
                }
                if !customer_number.chars().all(|c| c.is_ascii_digit()) {
                    return Err(crate::Error::config(
                        "netcup customer number must be numeric",
                    ));
                }
                if api_key.is_empty() {
                    return Err(crate::Error::config("netcup API key cannot be empty"));
                }
                if api_password.is_empty() {
                    return Err(crate::Error::config("netcup API password cannot be empty"));
                }
                if let Some(url) = endpoint
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "netcup endpoint must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("netcup timeout must be > 0"));
                }
                Ok(())
            }
            ProviderConfig::Memory { zones } => {
                if zones.iter().any(|z| z.trim_end_matches('.').is_empty()) {
                    return Err(crate::Error::config("Memory zone names cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Netcup { .. } => "netcup",
            ProviderConfig::Memory { .. } => "memory",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Memory { zones: Vec::new() }
    }
}

// Credentials never reach logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Netcup {
                customer_number,
                endpoint,
                timeout_secs,
                ..
            } => f
                .debug_struct("Netcup")
                .field("customer_number", customer_number)
                .field("api_key", &"<REDACTED>")
                .field("api_password", &"<REDACTED>")
                .field("endpoint", endpoint)
                .field("timeout_secs", timeout_secs)
                .finish(),
            ProviderConfig::Memory { zones } => {
                f.debug_struct("Memory").field("zones", zones).finish()
            }
            ProviderConfig::Custom { factory, .. } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", &"<OPAQUE>")
                .finish(),
        }
    }
}

/// How a record without an ID is matched when several current records share
/// its `(name, type)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// First unclaimed candidate in provider order
    #[default]
    FirstMatch,
    /// Fail with [`crate::Error::AmbiguousMatch`]
    Strict,
}

impl std::str::FromStr for MatchPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first_match" | "first-match" | "first" => Ok(MatchPolicy::FirstMatch),
            "strict" => Ok(MatchPolicy::Strict),
            other => Err(crate::Error::config(format!(
                "Unknown match policy '{}'. Valid policies: first_match, strict",
                other
            ))),
        }
    }
}

/// Reconciler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Tie-break for duplicate `(name, type)` matches
    #[serde(default)]
    pub match_policy: MatchPolicy,
}

fn default_timeout_secs() -> u64 {
    30
}
