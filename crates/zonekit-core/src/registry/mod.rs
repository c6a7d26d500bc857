//! Plugin-based provider registry
//!
//! The registry allows zone API implementations to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonekit_core::registry::ProviderRegistry;
//! use zonekit_core::config::ProviderConfig;
//!
//! let registry = ProviderRegistry::with_builtins();
//! zonekit_provider_netcup::register(&registry);
//!
//! let config = ProviderConfig::netcup("12345", "key", "password");
//! let api = registry.create_zone_api(&config)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::memory::MemoryFactory;
use crate::traits::{ZoneApi, ZoneApiFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Provider registry for plugin-based zone API creation
///
/// The registry maintains a map of provider type names to factory objects,
/// allowing dynamic instantiation of zone APIs based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Box<dyn ZoneApiFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the providers built into this crate (`memory`)
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_provider("memory", Box::new(MemoryFactory));
        registry
    }

    /// Register a zone API factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "netcup", "memory")
    /// - `factory`: Factory object for creating zone API instances
    pub fn register_provider(&self, name: impl Into<String>, factory: Box<dyn ZoneApiFactory>) {
        let name = name.into();
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        providers.insert(name, factory);
    }

    /// Create a zone API from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ZoneApi>)`: Created zone API instance
    /// - `Err(Error)`: If the configuration is invalid, the provider type is
    ///   not registered, or creation fails
    pub fn create_zone_api(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneApi>> {
        config.validate()?;

        let provider_type = config.type_name();
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config)
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProviderFactory;

    impl ZoneApiFactory for MockProviderFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn ZoneApi>> {
            Err(Error::provider("mock", "Mock provider not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        // Initially empty
        assert!(!registry.has_provider("mock"));

        // Register
        registry.register_provider("mock", Box::new(MockProviderFactory));

        // Now present
        assert!(registry.has_provider("mock"));
        assert!(registry.list_providers().contains(&"mock".to_string()));
    }

    #[test]
    fn test_builtins_create_memory_api() {
        let registry = ProviderRegistry::with_builtins();
        let api = registry.create_zone_api(&ProviderConfig::default()).unwrap();
        assert_eq!(api.provider_name(), "memory");
    }

    #[test]
    fn test_unknown_provider_type() {
        let registry = ProviderRegistry::with_builtins();
        let config = ProviderConfig::netcup("12345", "key", "password");

        let err = registry.create_zone_api(&config).err().unwrap();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("netcup")));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_lookup() {
        let registry = ProviderRegistry::with_builtins();
        let config = ProviderConfig::netcup("", "key", "password");

        let err = registry.create_zone_api(&config).err().unwrap();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("customer number")));
    }
}
