//! The `groundplane_volume` data source

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use groundplane_schema::{BlockSchema, Schema, SchemaMap};
use groundplane_sdk::{DataSource, ResourceData, ResourceMetaData};

use crate::client::VolumesClient;
use crate::id::VolumeId;
use crate::resource::{EncryptionModel, flatten_encryption};

pub struct VolumeDataSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VolumeDataSourceModel {
    name: String,
    project_id: String,
    #[serde(default)]
    size_gb: Option<i64>,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    encryption: Option<EncryptionModel>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
}

#[async_trait]
impl<C> DataSource<C> for VolumeDataSource
where
    C: AsRef<VolumesClient> + Send + Sync + 'static,
{
    fn type_name(&self) -> &str {
        "groundplane_volume"
    }

    fn arguments(&self) -> SchemaMap {
        SchemaMap::from([
            (
                "name".to_string(),
                Schema::string()
                    .required()
                    .with_description("Name of the volume to look up."),
            ),
            (
                "project_id".to_string(),
                Schema::string()
                    .required()
                    .with_description("Project the volume belongs to."),
            ),
        ])
    }

    fn attributes(&self) -> SchemaMap {
        SchemaMap::from([
            ("size_gb".to_string(), Schema::int().computed()),
            (
                "labels".to_string(),
                Schema::map_of(Schema::string()).computed(),
            ),
            (
                "encryption".to_string(),
                Schema::list_of_block(BlockSchema::new([
                    ("algorithm", Schema::string().optional()),
                    ("key_id", Schema::string().optional()),
                ]))
                .computed()
                .with_max_items(1),
            ),
            ("location".to_string(), Schema::string().computed()),
            ("endpoint".to_string(), Schema::string().computed()),
        ])
    }

    async fn read(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()> {
        let mut model: VolumeDataSourceModel = metadata.decode()?;
        let client = Arc::clone(&metadata.client);
        let volumes: &VolumesClient = (*client).as_ref();

        let id = VolumeId::new(&model.project_id, &model.name);
        let volume = volumes
            .get(&id)
            .await
            .with_context(|| format!("retrieving {id}"))?
            .ok_or_else(|| anyhow::anyhow!("{id} was not found"))?;

        model.size_gb = Some(volume.size_gb);
        model.labels = volume.labels;
        model.encryption = flatten_encryption(volume.encryption.as_ref());
        model.location = Some(volume.location);
        model.endpoint = Some(volume.endpoint);
        metadata.encode(&model)?;
        metadata.data.set_id(&id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundplane_sdk::data_source_schema;

    struct Clients {
        #[allow(dead_code)]
        volumes: VolumesClient,
    }

    impl AsRef<VolumesClient> for Clients {
        fn as_ref(&self) -> &VolumesClient {
            &self.volumes
        }
    }

    #[test]
    fn schema_marks_looked_up_fields_as_computed() {
        let schema = data_source_schema::<Clients>(&VolumeDataSource).unwrap();
        assert!(schema.attribute("name").unwrap().required);
        assert!(schema.attribute("size_gb").unwrap().computed);
        assert!(schema.attribute("labels").unwrap().computed);
    }
}
