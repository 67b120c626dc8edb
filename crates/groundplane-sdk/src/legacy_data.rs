//! Legacy protocol adapter
//!
//! [`ResourceData`] over the legacy generation's map-based state: a flat
//! attribute map per resource instance, a configuration map per call, and a
//! change-set computed by diffing the two.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;

use groundplane_schema::{AttrMap, AttrValue, AttributeSchema};

use crate::error::{Result, SdkError};
use crate::resource_data::{Operation, OperationTimeouts, ResourceData};

/// Persisted state of one resource instance under the legacy protocol.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyInstanceState {
    pub id: String,
    pub attributes: AttrMap,
}

impl LegacyInstanceState {
    pub fn new(id: impl Into<String>, attributes: AttrMap) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }
}

/// [`ResourceData`] bound to one legacy lifecycle call.
pub struct LegacyResourceData {
    schema: Arc<AttributeSchema>,
    operation: Operation,
    timeouts: OperationTimeouts,
    config: AttrMap,
    prior: LegacyInstanceState,
    written: AttrMap,
    id: String,
    removed: bool,
    // Diffed on first query, cached for the rest of the call.
    changes: OnceCell<BTreeMap<String, (AttrValue, AttrValue)>>,
}

impl LegacyResourceData {
    fn new(
        schema: Arc<AttributeSchema>,
        operation: Operation,
        timeouts: OperationTimeouts,
        config: AttrMap,
        prior: LegacyInstanceState,
    ) -> Self {
        let id = prior.id.clone();
        Self {
            schema,
            operation,
            timeouts,
            config,
            prior,
            written: AttrMap::new(),
            id,
            removed: false,
            changes: OnceCell::new(),
        }
    }

    pub fn for_create(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        config: AttrMap,
    ) -> Self {
        Self::new(
            schema,
            Operation::Create,
            timeouts,
            config,
            LegacyInstanceState::default(),
        )
    }

    pub fn for_read(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        prior: LegacyInstanceState,
    ) -> Self {
        Self::new(schema, Operation::Read, timeouts, AttrMap::new(), prior)
    }

    pub fn for_update(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        config: AttrMap,
        prior: LegacyInstanceState,
    ) -> Self {
        Self::new(schema, Operation::Update, timeouts, config, prior)
    }

    pub fn for_delete(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        prior: LegacyInstanceState,
    ) -> Self {
        Self::new(schema, Operation::Delete, timeouts, AttrMap::new(), prior)
    }

    pub fn for_import(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        id: impl Into<String>,
    ) -> Self {
        Self::new(
            schema,
            Operation::Import,
            timeouts,
            AttrMap::new(),
            LegacyInstanceState::new(id, AttrMap::new()),
        )
    }

    /// Adapter for a data-source read: the configuration carries the
    /// arguments, and there is no prior state.
    pub fn for_data_source_read(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        config: AttrMap,
    ) -> Self {
        let mut data = Self::new(
            schema,
            Operation::Read,
            timeouts,
            AttrMap::new(),
            LegacyInstanceState::default(),
        );
        // Arguments are readable through the state source during the read.
        data.prior.attributes = config;
        data
    }

    fn change_set(&self) -> &BTreeMap<String, (AttrValue, AttrValue)> {
        self.changes.get_or_init(|| {
            let mut changes = BTreeMap::new();
            for key in self.config.keys() {
                let original = self
                    .prior
                    .attributes
                    .get(key)
                    .cloned()
                    .unwrap_or(AttrValue::Null);
                let updated = self.config.get(key).cloned().unwrap_or(AttrValue::Null);
                changes.insert(key.clone(), (original, updated));
            }
            changes
        })
    }

    /// Consumes the adapter and yields the state to persist, or `None`
    /// when the resource was removed via `set_id("")`.
    pub fn into_state(self) -> Option<LegacyInstanceState> {
        if self.removed {
            return None;
        }
        let mut attributes = match self.operation {
            Operation::Create | Operation::Update => self.config,
            Operation::Read | Operation::Import | Operation::Delete => self.prior.attributes,
        };
        attributes.extend(self.written);
        Some(LegacyInstanceState {
            id: self.id,
            attributes,
        })
    }
}

impl ResourceData for LegacyResourceData {
    fn get(&self, key: &str) -> AttrValue {
        // A removed resource has no attributes left to read.
        if self.removed {
            return AttrValue::Null;
        }
        if let Some(value) = self.written.get(key) {
            return value.clone();
        }
        let source = match self.operation {
            Operation::Create | Operation::Update => &self.config,
            Operation::Read | Operation::Import => &self.prior.attributes,
            Operation::Delete => {
                tracing::warn!(key, "get called during delete; returning null");
                return AttrValue::Null;
            }
        };
        source.get(key).cloned().unwrap_or(AttrValue::Null)
    }

    fn get_change(&self, key: &str) -> (AttrValue, AttrValue) {
        if let Some((original, updated)) = self.change_set().get(key) {
            return (original.clone(), updated.clone());
        }
        let value = self
            .prior
            .attributes
            .get(key)
            .cloned()
            .unwrap_or(AttrValue::Null);
        (value.clone(), value)
    }

    fn get_value(&self, key: &str) -> (AttrValue, bool) {
        let value = self.get(key);
        let set = !value.is_zero();
        (value, set)
    }

    fn get_raw_value(&self, key: &str) -> (AttrValue, bool) {
        let value = self.get(key);
        let set = !value.is_null();
        (value, set)
    }

    fn has_change(&self, key: &str) -> bool {
        let (original, updated) = self.get_change(key);
        original != updated
    }

    fn id(&self) -> String {
        if self.removed {
            return String::new();
        }
        self.id.clone()
    }

    fn is_new_resource(&self) -> bool {
        self.operation == Operation::Create
    }

    fn set(&mut self, key: &str, value: AttrValue) -> Result<()> {
        self.schema
            .check_write(key, &value)
            .map_err(|source| SdkError::StateWrite {
                key: key.to_string(),
                source,
            })?;
        self.written.insert(key.to_string(), value);
        Ok(())
    }

    fn set_id(&mut self, id: &str) {
        if id.is_empty() {
            tracing::debug!("resource marked as removed from state");
            self.removed = true;
            self.id.clear();
        } else {
            self.removed = false;
            self.id = id.to_string();
        }
    }

    fn timeout(&self, operation: Operation) -> Duration {
        self.timeouts.for_operation(operation)
    }
}
