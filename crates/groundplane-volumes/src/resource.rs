//! The `groundplane_volume` resource

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use groundplane_schema::{BlockSchema, Schema, SchemaMap};
use groundplane_sdk::{OperationTimeouts, Resource, ResourceData, ResourceMetaData};

use crate::client::{CreateVolumeBody, EncryptionSettings, UpdateVolumeBody, VolumesClient};
use crate::id::VolumeId;

pub struct VolumeResource;

/// State/configuration model of one volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeModel {
    pub name: String,
    pub project_id: String,
    pub size_gb: i64,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub encryption: Option<EncryptionModel>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// The `encryption` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptionModel {
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub key_id: Option<String>,
}

pub(crate) fn expand_encryption(input: Option<&EncryptionModel>) -> Option<EncryptionSettings> {
    input.map(|model| EncryptionSettings {
        algorithm: model.algorithm.clone(),
        key_id: model.key_id.clone(),
    })
}

pub(crate) fn flatten_encryption(input: Option<&EncryptionSettings>) -> Option<EncryptionModel> {
    input.map(|settings| EncryptionModel {
        algorithm: settings.algorithm.clone(),
        key_id: settings.key_id.clone(),
    })
}

impl VolumeResource {
    fn model_from_volume(volume: crate::client::Volume) -> VolumeModel {
        VolumeModel {
            name: volume.name,
            project_id: volume.project_id,
            size_gb: volume.size_gb,
            labels: volume.labels,
            encryption: flatten_encryption(volume.encryption.as_ref()),
            location: Some(volume.location),
            endpoint: Some(volume.endpoint),
        }
    }
}

#[async_trait]
impl<C> Resource<C> for VolumeResource
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
                    .force_new()
                    .with_description("Name of the volume."),
            ),
            (
                "project_id".to_string(),
                Schema::string()
                    .required()
                    .force_new()
                    .with_description("Project the volume belongs to."),
            ),
            (
                "size_gb".to_string(),
                Schema::int()
                    .required()
                    .with_description("Provisioned size in gigabytes."),
            ),
            (
                "labels".to_string(),
                Schema::map_of(Schema::string()).optional(),
            ),
            (
                "encryption".to_string(),
                Schema::list_of_block(BlockSchema::new([
                    ("algorithm", Schema::string().optional()),
                    ("key_id", Schema::string().optional()),
                ]))
                .optional()
                .with_max_items(1),
            ),
        ])
    }

    fn attributes(&self) -> SchemaMap {
        SchemaMap::from([
            ("location".to_string(), Schema::string().computed()),
            ("endpoint".to_string(), Schema::string().computed()),
        ])
    }

    fn timeouts(&self) -> OperationTimeouts {
        OperationTimeouts {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }

    async fn create(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()> {
        let model: VolumeModel = metadata.decode()?;
        let client = Arc::clone(&metadata.client);
        let volumes: &VolumesClient = (*client).as_ref();

        let id = VolumeId::new(&model.project_id, &model.name);
        if volumes
            .get(&id)
            .await
            .with_context(|| format!("checking for an existing {id}"))?
            .is_some()
        {
            return Err(metadata.resource_requires_import(Resource::<C>::type_name(self), &id));
        }

        let body = CreateVolumeBody {
            size_gb: model.size_gb,
            labels: model.labels.clone(),
            encryption: expand_encryption(model.encryption.as_ref()),
        };
        let created = volumes
            .create(&id, &body)
            .await
            .with_context(|| format!("creating {id}"))?;

        metadata.encode(&Self::model_from_volume(created))?;
        metadata.data.set_id(&id.to_string());
        Ok(())
    }

    async fn read(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()> {
        let id = VolumeId::parse(&metadata.data.id())?;
        let client = Arc::clone(&metadata.client);
        let volumes: &VolumesClient = (*client).as_ref();

        match volumes
            .get(&id)
            .await
            .with_context(|| format!("retrieving {id}"))?
        {
            None => metadata.mark_as_gone(&id),
            Some(volume) => {
                metadata.encode(&Self::model_from_volume(volume))?;
                Ok(())
            }
        }
    }

    async fn update(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()> {
        let model: VolumeModel = metadata.decode()?;
        let id = VolumeId::parse(&metadata.data.id())?;
        let client = Arc::clone(&metadata.client);
        let volumes: &VolumesClient = (*client).as_ref();

        // Only ship the fields that actually changed.
        let mut body = UpdateVolumeBody::default();
        if metadata.data.has_change("size_gb") {
            body.size_gb = Some(model.size_gb);
        }
        if metadata.data.has_change("labels") {
            body.labels = Some(model.labels.clone());
        }
        if body.is_empty() {
            tracing::debug!(%id, "no updatable changes");
            return Ok(());
        }

        let updated = volumes
            .update(&id, &body)
            .await
            .with_context(|| format!("updating {id}"))?;
        metadata.encode(&Self::model_from_volume(updated))?;
        Ok(())
    }

    async fn delete(&self, metadata: &mut ResourceMetaData<'_, C>) -> anyhow::Result<()> {
        let id = VolumeId::parse(&metadata.data.id())?;
        let client = Arc::clone(&metadata.client);
        let volumes: &VolumesClient = (*client).as_ref();

        volumes
            .delete(&id)
            .await
            .with_context(|| format!("deleting {id}"))
    }
}
