//! Declarative protocol adapter
//!
//! [`ResourceData`] over the newer generation's structured state: a
//! [`StateDocument`] validated attribute-by-attribute against the compiled
//! schema, with explicit resource-removal semantics.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;

use groundplane_schema::{AttrMap, AttrValue, AttributeSchema, SchemaError};

use crate::error::{Result, SdkError};
use crate::resource_data::{Operation, OperationTimeouts, ResourceData};

/// Identity travels as a regular attribute in the declarative protocol.
pub const ID_ATTRIBUTE: &str = "id";

/// The structured state of one resource instance.
///
/// A document is either present (holding an attribute tree) or absent
/// (the resource does not exist). Writes are validated against the
/// compiled schema before they land.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateDocument {
    values: AttrMap,
    present: bool,
}

impl StateDocument {
    /// An absent document: the resource does not exist.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(values: AttrMap) -> Self {
        Self {
            values,
            present: true,
        }
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn values(&self) -> &AttrMap {
        &self.values
    }

    /// Reads one attribute; `Null` when absent.
    pub fn get_attribute(&self, key: &str) -> AttrValue {
        self.values.get(key).cloned().unwrap_or(AttrValue::Null)
    }

    /// Writes one attribute after validating it against `schema`.
    pub fn set_attribute(
        &mut self,
        schema: &AttributeSchema,
        key: &str,
        value: AttrValue,
    ) -> std::result::Result<(), SchemaError> {
        schema.check_write(key, &value)?;
        self.values.insert(key.to_string(), value);
        self.present = true;
        Ok(())
    }

    /// Marks the resource as gone: the document becomes absent and its
    /// attributes are dropped.
    pub fn remove_resource(&mut self) {
        self.values.clear();
        self.present = false;
    }

    /// The stored identity, or an empty string when absent.
    pub fn id(&self) -> String {
        match self.get_attribute(ID_ATTRIBUTE) {
            AttrValue::String(id) => id,
            _ => String::new(),
        }
    }

    fn set_id(&mut self, id: &str) {
        self.values
            .insert(ID_ATTRIBUTE.to_string(), AttrValue::String(id.to_string()));
        self.present = true;
    }
}

/// [`ResourceData`] bound to one declarative lifecycle call.
pub struct DeclarativeResourceData {
    schema: Arc<AttributeSchema>,
    operation: Operation,
    timeouts: OperationTimeouts,
    config: StateDocument,
    prior: StateDocument,
    state: StateDocument,
    changes: OnceCell<BTreeMap<String, (AttrValue, AttrValue)>>,
}

impl DeclarativeResourceData {
    fn new(
        schema: Arc<AttributeSchema>,
        operation: Operation,
        timeouts: OperationTimeouts,
        config: StateDocument,
        prior: StateDocument,
    ) -> Self {
        // The working document starts from whatever the phase reads:
        // configuration for create/update, prior state otherwise.
        let mut state = match operation {
            Operation::Create | Operation::Update => config.clone(),
            Operation::Read | Operation::Import | Operation::Delete => prior.clone(),
        };
        // Configuration never carries identity; an update keeps the prior
        // identity until the contract changes it.
        if operation == Operation::Update && state.id().is_empty() {
            let prior_id = prior.id();
            if !prior_id.is_empty() {
                state.set_id(&prior_id);
            }
        }
        Self {
            schema,
            operation,
            timeouts,
            config,
            prior,
            state,
            changes: OnceCell::new(),
        }
    }

    pub fn for_create(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        config: StateDocument,
    ) -> Self {
        Self::new(
            schema,
            Operation::Create,
            timeouts,
            config,
            StateDocument::empty(),
        )
    }

    pub fn for_read(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        prior: StateDocument,
    ) -> Self {
        Self::new(
            schema,
            Operation::Read,
            timeouts,
            StateDocument::empty(),
            prior,
        )
    }

    pub fn for_update(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        config: StateDocument,
        prior: StateDocument,
    ) -> Self {
        Self::new(schema, Operation::Update, timeouts, config, prior)
    }

    pub fn for_delete(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        prior: StateDocument,
    ) -> Self {
        Self::new(
            schema,
            Operation::Delete,
            timeouts,
            StateDocument::empty(),
            prior,
        )
    }

    pub fn for_import(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        id: &str,
    ) -> Self {
        let mut prior = StateDocument::empty();
        prior.set_id(id);
        Self::new(
            schema,
            Operation::Import,
            timeouts,
            StateDocument::empty(),
            prior,
        )
    }

    /// Adapter for a data-source read: arguments arrive in the
    /// configuration and seed the working document directly.
    pub fn for_data_source_read(
        schema: Arc<AttributeSchema>,
        timeouts: OperationTimeouts,
        config: StateDocument,
    ) -> Self {
        let mut data = Self::new(
            schema,
            Operation::Read,
            timeouts,
            StateDocument::empty(),
            StateDocument::empty(),
        );
        data.state = config;
        data
    }

    fn change_set(&self) -> &BTreeMap<String, (AttrValue, AttrValue)> {
        self.changes.get_or_init(|| {
            let mut changes = BTreeMap::new();
            for key in self.config.values().keys() {
                let original = self.prior.get_attribute(key);
                let updated = self.config.get_attribute(key);
                changes.insert(key.clone(), (original, updated));
            }
            changes
        })
    }

    /// Consumes the adapter and yields the document to persist, or `None`
    /// when the resource was removed via `set_id("")`.
    pub fn into_state(self) -> Option<StateDocument> {
        if !self.state.is_present() {
            return None;
        }
        Some(self.state)
    }
}

impl ResourceData for DeclarativeResourceData {
    fn get(&self, key: &str) -> AttrValue {
        if self.operation == Operation::Delete {
            tracing::warn!(key, "get called during delete; returning null");
            return AttrValue::Null;
        }
        self.state.get_attribute(key)
    }

    fn get_change(&self, key: &str) -> (AttrValue, AttrValue) {
        if let Some((original, updated)) = self.change_set().get(key) {
            return (original.clone(), updated.clone());
        }
        let value = self.prior.get_attribute(key);
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
        self.state.id()
    }

    fn is_new_resource(&self) -> bool {
        self.operation == Operation::Create
    }

    fn set(&mut self, key: &str, value: AttrValue) -> Result<()> {
        self.state
            .set_attribute(&self.schema, key, value)
            .map_err(|source| SdkError::StateWrite {
                key: key.to_string(),
                source,
            })
    }

    fn set_id(&mut self, id: &str) {
        if id.is_empty() {
            tracing::debug!("resource marked as removed from state");
            self.state.remove_resource();
        } else {
            self.state.set_id(id);
        }
    }

    fn timeout(&self, operation: Operation) -> Duration {
        self.timeouts.for_operation(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundplane_schema::{Schema, SchemaMap, compile_schema};

    fn demo_schema() -> Arc<AttributeSchema> {
        let arguments = SchemaMap::from([
            ("name".to_string(), Schema::string().required()),
            ("size_gb".to_string(), Schema::int().optional()),
        ]);
        let attributes = SchemaMap::from([
            ("location".to_string(), Schema::string().computed()),
            ("id".to_string(), Schema::string().computed()),
        ]);
        Arc::new(compile_schema("demo", &arguments, &attributes, 0).unwrap())
    }

    fn config(name: &str) -> StateDocument {
        StateDocument::new(AttrMap::from([(
            "name".to_string(),
            AttrValue::from(name),
        )]))
    }

    #[test]
    fn create_reads_config_and_commits_writes() {
        let mut data = DeclarativeResourceData::for_create(
            demo_schema(),
            OperationTimeouts::default(),
            config("demo"),
        );

        assert!(data.is_new_resource());
        assert_eq!(data.get("name"), AttrValue::from("demo"));

        data.set("location", AttrValue::from("Berlin")).unwrap();
        data.set_id("demo-id");
        assert_eq!(data.id(), "demo-id");

        let state = data.into_state().unwrap();
        assert_eq!(state.get_attribute("name"), AttrValue::from("demo"));
        assert_eq!(state.get_attribute("location"), AttrValue::from("Berlin"));
        assert_eq!(state.id(), "demo-id");
    }

    #[test]
    fn writes_are_validated_against_the_schema() {
        let mut data = DeclarativeResourceData::for_create(
            demo_schema(),
            OperationTimeouts::default(),
            config("demo"),
        );
        let err = data.set("size_gb", AttrValue::from("twenty")).unwrap_err();
        assert!(matches!(err, SdkError::StateWrite { .. }));
    }

    #[test]
    fn removal_clears_identity_and_state() {
        let mut prior = StateDocument::new(AttrMap::from([(
            "name".to_string(),
            AttrValue::from("demo"),
        )]));
        prior.set_id("demo-id");
        let mut data = DeclarativeResourceData::for_read(
            demo_schema(),
            OperationTimeouts::default(),
            prior,
        );
        assert_eq!(data.id(), "demo-id");

        data.set_id("");
        assert_eq!(data.id(), "");
        assert_eq!(data.get("name"), AttrValue::Null);
        assert!(data.into_state().is_none());
    }

    #[test]
    fn import_seeds_only_the_identity() {
        let data = DeclarativeResourceData::for_import(
            demo_schema(),
            OperationTimeouts::default(),
            "demo-id",
        );
        assert_eq!(data.id(), "demo-id");
        assert!(!data.is_new_resource());
        assert_eq!(data.get("name"), AttrValue::Null);
    }

    #[test]
    fn change_set_matches_the_legacy_adapter_semantics() {
        let mut prior = StateDocument::new(AttrMap::from([
            ("name".to_string(), AttrValue::from("demo")),
            ("size_gb".to_string(), AttrValue::from(10_i64)),
        ]));
        prior.set_id("demo-id");
        let config = StateDocument::new(AttrMap::from([
            ("name".to_string(), AttrValue::from("demo")),
            ("size_gb".to_string(), AttrValue::from(20_i64)),
        ]));
        let data = DeclarativeResourceData::for_update(
            demo_schema(),
            OperationTimeouts::default(),
            config,
            prior,
        );

        assert!(!data.has_change("name"));
        assert!(data.has_change("size_gb"));
        assert_eq!(
            data.get_change("size_gb"),
            (AttrValue::from(10_i64), AttrValue::from(20_i64))
        );
    }
}
