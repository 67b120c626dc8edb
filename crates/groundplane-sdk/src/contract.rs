//! Typed resource contracts
//!
//! The backend-agnostic interface a resource or data-source author
//! implements once. Wrappers adapt it to whichever protocol generation the
//! host speaks; the author never sees the difference.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use groundplane_schema::{AttrValue, AttributeSchema, SchemaMap};

use crate::declarative_data::ID_ATTRIBUTE;
use crate::error::{Result, SdkError};
use crate::resource_data::{OperationTimeouts, ResourceData};

/// A managed resource kind.
///
/// `C` is the provider's client handle; contract functions reach the remote
/// control plane exclusively through it.
#[async_trait]
pub trait Resource<C: Send + Sync>: Send + Sync {
    /// The resource type name, e.g. `groundplane_volume`.
    fn type_name(&self) -> &str;

    /// User-settable fields.
    fn arguments(&self) -> SchemaMap;

    /// Computed-only fields.
    fn attributes(&self) -> SchemaMap;

    /// Schema version, surfaced to the host for state-upgrade support.
    fn schema_version(&self) -> i64 {
        0
    }

    fn timeouts(&self) -> OperationTimeouts {
        OperationTimeouts::default()
    }

    async fn create(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()>;

    async fn read(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()>;

    async fn update(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()> {
        let _ = metadata;
        Err(SdkError::NotImplemented("update").into())
    }

    async fn delete(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()>;
}

/// A read-only data-source kind.
#[async_trait]
pub trait DataSource<C: Send + Sync>: Send + Sync {
    /// The data-source type name, e.g. `groundplane_volume`.
    fn type_name(&self) -> &str;

    fn arguments(&self) -> SchemaMap;

    fn attributes(&self) -> SchemaMap;

    fn read_timeout(&self) -> Duration {
        Duration::from_secs(5 * 60)
    }

    async fn read(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()>;
}

/// Everything a contract function gets to work with: the client handle and
/// the state access for the in-flight call.
pub struct ResourceMetaData<'a, C> {
    pub client: Arc<C>,
    pub data: &'a mut dyn ResourceData,
    schema: Arc<AttributeSchema>,
}

impl<'a, C> ResourceMetaData<'a, C> {
    pub fn new(
        client: Arc<C>,
        schema: Arc<AttributeSchema>,
        data: &'a mut dyn ResourceData,
    ) -> Self {
        Self {
            client,
            data,
            schema,
        }
    }

    /// Decodes the current attribute store into a typed model.
    ///
    /// Fields read as their effective value for the phase; absent fields
    /// are omitted so optional model fields fall back to their defaults.
    pub fn decode<M: DeserializeOwned>(&self) -> Result<M> {
        let mut object = serde_json::Map::new();
        for name in self.schema.attributes.keys() {
            let value = self.data.get(name);
            if !value.is_null() {
                object.insert(name.clone(), value.to_json());
            }
        }
        serde_json::from_value(serde_json::Value::Object(object)).map_err(SdkError::Decode)
    }

    /// Encodes a typed model into the pending state, field by field. Each
    /// field is coerced and validated against its compiled attribute; the
    /// identity attribute is skipped (identity only moves via `set_id`).
    pub fn encode<M: Serialize>(&mut self, model: &M) -> Result<()> {
        let value = serde_json::to_value(model).map_err(SdkError::Encode)?;
        let serde_json::Value::Object(object) = value else {
            return Err(SdkError::Encode(
                <serde_json::Error as serde::ser::Error>::custom(
                    "resource models must serialize to an object",
                ),
            ));
        };
        for (key, field) in object {
            if key == ID_ATTRIBUTE {
                continue;
            }
            let attribute =
                self.schema
                    .attribute(&key)
                    .ok_or_else(|| SdkError::StateWrite {
                        key: key.clone(),
                        source: groundplane_schema::SchemaError::UnknownAttribute {
                            name: key.clone(),
                        },
                    })?;
            let value = attribute
                .kind
                .value_from_json(&key, field)
                .map_err(|source| SdkError::StateWrite {
                    key: key.clone(),
                    source,
                })?;
            self.data.set(&key, value)?;
        }
        Ok(())
    }

    /// The error a Create function returns when the remote resource
    /// already exists and must be imported instead of re-created.
    pub fn resource_requires_import(
        &self,
        type_name: &str,
        id: &impl std::fmt::Display,
    ) -> anyhow::Error {
        SdkError::ResourceRequiresImport {
            type_name: type_name.to_string(),
            id: id.to_string(),
        }
        .into()
    }

    /// Drops the resource from state during a Read that found it gone on
    /// the remote side. Returns `Ok` so the read completes cleanly.
    pub fn mark_as_gone(&mut self, id: &impl std::fmt::Display) -> anyhow::Result<()> {
        tracing::info!(%id, "resource was not found; removing from state");
        self.data.set_id("");
        Ok(())
    }
}

impl<C> ResourceMetaData<'_, C> {
    /// Convenience accessor for the common "read one string field".
    pub fn get_string(&self, key: &str) -> String {
        match self.data.get(key) {
            AttrValue::String(value) => value,
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use groundplane_schema::{AttrMap, Schema, SchemaMap, compile_schema};

    use crate::declarative_data::{DeclarativeResourceData, StateDocument};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct DemoModel {
        name: String,
        #[serde(default)]
        size_gb: i64,
        #[serde(default)]
        labels: BTreeMap<String, String>,
        #[serde(default)]
        location: Option<String>,
    }

    fn demo_schema() -> Arc<AttributeSchema> {
        let arguments = SchemaMap::from([
            ("name".to_string(), Schema::string().required()),
            ("size_gb".to_string(), Schema::int().optional()),
            (
                "labels".to_string(),
                Schema::map_of(Schema::string()).optional(),
            ),
        ]);
        let attributes = SchemaMap::from([
            ("location".to_string(), Schema::string().computed()),
            ("id".to_string(), Schema::string().computed()),
        ]);
        Arc::new(compile_schema("demo", &arguments, &attributes, 0).unwrap())
    }

    #[test]
    fn decode_and_encode_round_trip_through_the_store() {
        let schema = demo_schema();
        let config = StateDocument::new(AttrMap::from([
            ("name".to_string(), AttrValue::from("demo")),
            ("size_gb".to_string(), AttrValue::from(20_i64)),
        ]));
        let mut data = DeclarativeResourceData::for_create(
            schema.clone(),
            OperationTimeouts::default(),
            config,
        );
        let client = Arc::new(());
        let mut metadata = ResourceMetaData::new(client, schema, &mut data);

        let mut model: DemoModel = metadata.decode().unwrap();
        assert_eq!(model.name, "demo");
        assert_eq!(model.size_gb, 20);
        assert_eq!(model.location, None);

        model.location = Some("Berlin".to_string());
        model
            .labels
            .insert("team".to_string(), "storage".to_string());
        metadata.encode(&model).unwrap();

        assert_eq!(metadata.data.get("location"), AttrValue::from("Berlin"));
        match metadata.data.get("labels") {
            AttrValue::Map(entries) => {
                assert_eq!(entries.get("team"), Some(&AttrValue::from("storage")));
            }
            other => panic!("expected a map, got {other:?}"),
        }
    }

    #[test]
    fn encode_rejects_fields_the_schema_does_not_know() {
        #[derive(Serialize)]
        struct Unknown {
            name: String,
            shoe_size: i64,
        }
        let schema = demo_schema();
        let mut data = DeclarativeResourceData::for_create(
            schema.clone(),
            OperationTimeouts::default(),
            StateDocument::empty(),
        );
        let mut metadata = ResourceMetaData::new(Arc::new(()), schema, &mut data);
        let err = metadata
            .encode(&Unknown {
                name: "demo".to_string(),
                shoe_size: 44,
            })
            .unwrap_err();
        assert!(matches!(err, SdkError::StateWrite { .. }));
    }
}
