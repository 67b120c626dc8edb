//! Groundplane provider wiring
//!
//! Ties the pieces together for the host: the provider block's own
//! configuration schema, the aggregated API [`Client`], and the
//! [`Registry`] of shipped resources and data sources, each servable over
//! either protocol generation through the SDK wrappers.

pub mod client;
pub mod config;
pub mod error;
pub mod registry;

// Re-exports
pub use client::Client;
pub use config::{ProviderConfig, provider_schema};
pub use error::{ProviderError, Result};
pub use registry::Registry;

use std::sync::Arc;

use groundplane_schema::{AttributeSchema, SchemaMap, compile_schema};
use groundplane_sdk::{
    DeclarativeDataSourceWrapper, DeclarativeResourceWrapper, LegacyDataSourceWrapper,
    LegacyResourceWrapper,
};

/// Version of the provider block's own schema.
const PROVIDER_SCHEMA_VERSION: i64 = 1;

/// A configured provider: resolved configuration, a connected client, and
/// the registry of contracts it serves.
pub struct Provider {
    pub config: ProviderConfig,
    pub client: Arc<Client>,
    pub registry: Registry,
}

impl Provider {
    /// Builds a provider from resolved configuration.
    pub fn connect(config: ProviderConfig) -> Result<Self> {
        let client = Arc::new(Client::new(&config)?);
        Ok(Self {
            config,
            client,
            registry: Registry::built_in(),
        })
    }

    /// The compiled schema of the provider block itself.
    pub fn schema() -> Result<AttributeSchema> {
        Ok(compile_schema(
            "groundplane",
            &provider_schema(),
            &SchemaMap::new(),
            PROVIDER_SCHEMA_VERSION,
        )?)
    }

    /// A declarative-protocol wrapper for one registered resource.
    pub fn declarative_resource(&self, name: &str) -> Option<DeclarativeResourceWrapper<Client>> {
        let resource = self.registry.resource(name)?;
        Some(DeclarativeResourceWrapper::new(
            resource,
            self.client.clone(),
        ))
    }

    /// A legacy-protocol wrapper for one registered resource.
    pub fn legacy_resource(&self, name: &str) -> Option<LegacyResourceWrapper<Client>> {
        let resource = self.registry.resource(name)?;
        Some(LegacyResourceWrapper::new(resource, self.client.clone()))
    }

    /// A declarative-protocol wrapper for one registered data source.
    pub fn declarative_data_source(
        &self,
        name: &str,
    ) -> Option<DeclarativeDataSourceWrapper<Client>> {
        let data_source = self.registry.data_source(name)?;
        Some(DeclarativeDataSourceWrapper::new(
            data_source,
            self.client.clone(),
        ))
    }

    /// A legacy-protocol wrapper for one registered data source.
    pub fn legacy_data_source(&self, name: &str) -> Option<LegacyDataSourceWrapper<Client>> {
        let data_source = self.registry.data_source(name)?;
        Some(LegacyDataSourceWrapper::new(
            data_source,
            self.client.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_schema_compiles() {
        let schema = Provider::schema().unwrap();
        assert_eq!(schema.version, PROVIDER_SCHEMA_VERSION);
        assert!(schema.attribute("token").unwrap().sensitive);
        assert!(schema.attribute("endpoint").unwrap().optional);
    }

    #[test]
    fn connected_provider_serves_wrappers() {
        let config = ProviderConfig {
            endpoint: "https://api.example.test".to_string(),
            token: "tok".to_string(),
            project: "acme".to_string(),
            zone: None,
        };
        let provider = Provider::connect(config).unwrap();
        assert!(provider.declarative_resource("groundplane_volume").is_some());
        assert!(provider.legacy_resource("groundplane_volume").is_some());
        assert!(
            provider
                .declarative_data_source("groundplane_volume")
                .is_some()
        );
        assert!(provider.declarative_resource("nope").is_none());
    }
}
