//! Resource and data-source registry
//!
//! Maps type names to the contracts the provider ships. Registration
//! happens once at startup; afterwards the registry only serves lookups
//! and compiled schemas.

use std::collections::BTreeMap;
use std::sync::Arc;

use groundplane_schema::AttributeSchema;
use groundplane_sdk::{DataSource, Resource, data_source_schema, resource_schema};
use groundplane_volumes::{VolumeDataSource, VolumeResource};

use crate::client::Client;
use crate::error::{ProviderError, Result};

#[derive(Default)]
pub struct Registry {
    resources: BTreeMap<String, Arc<dyn Resource<Client>>>,
    data_sources: BTreeMap<String, Arc<dyn DataSource<Client>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All contracts the provider ships.
    pub fn built_in() -> Self {
        let mut registry = Self::new();
        // Registration of built-ins cannot collide.
        let _ = registry.register_resource(Arc::new(VolumeResource));
        let _ = registry.register_data_source(Arc::new(VolumeDataSource));
        registry
    }

    pub fn register_resource(&mut self, resource: Arc<dyn Resource<Client>>) -> Result<()> {
        let name = resource.type_name().to_string();
        if self.resources.contains_key(&name) {
            return Err(ProviderError::DuplicateType {
                kind: "resource",
                name,
            });
        }
        tracing::debug!(name, "registered resource");
        self.resources.insert(name, resource);
        Ok(())
    }

    pub fn register_data_source(
        &mut self,
        data_source: Arc<dyn DataSource<Client>>,
    ) -> Result<()> {
        let name = data_source.type_name().to_string();
        if self.data_sources.contains_key(&name) {
            return Err(ProviderError::DuplicateType {
                kind: "data source",
                name,
            });
        }
        tracing::debug!(name, "registered data source");
        self.data_sources.insert(name, data_source);
        Ok(())
    }

    pub fn resource(&self, name: &str) -> Option<Arc<dyn Resource<Client>>> {
        self.resources.get(name).cloned()
    }

    pub fn data_source(&self, name: &str) -> Option<Arc<dyn DataSource<Client>>> {
        self.data_sources.get(name).cloned()
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_names(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    /// Compiled schemas of every registered resource.
    pub fn resource_schemas(&self) -> Result<BTreeMap<String, Arc<AttributeSchema>>> {
        self.resources
            .iter()
            .map(|(name, resource)| {
                let schema = resource_schema(resource.as_ref())?;
                Ok((name.clone(), schema))
            })
            .collect()
    }

    /// Compiled schemas of every registered data source.
    pub fn data_source_schemas(&self) -> Result<BTreeMap<String, Arc<AttributeSchema>>> {
        self.data_sources
            .iter()
            .map(|(name, data_source)| {
                let schema = data_source_schema(data_source.as_ref())?;
                Ok((name.clone(), schema))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_ins_register_and_serve_schemas() {
        let registry = Registry::built_in();
        assert!(registry.resource("groundplane_volume").is_some());
        assert!(registry.data_source("groundplane_volume").is_some());
        assert!(registry.resource("groundplane_unknown").is_none());

        let schemas = registry.resource_schemas().unwrap();
        let volume = schemas.get("groundplane_volume").unwrap();
        assert!(volume.attribute("name").unwrap().required);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = Registry::built_in();
        let err = registry
            .register_resource(Arc::new(VolumeResource))
            .unwrap_err();
        assert!(matches!(err, ProviderError::DuplicateType { .. }));
    }
}
