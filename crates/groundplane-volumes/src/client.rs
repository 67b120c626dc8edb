//! Volumes API client
//!
//! Typed wrapper over the control plane's volume endpoints. The SDK core
//! treats this client as opaque: calls may fail with an error, and calls
//! may block until the surrounding operation timeout elapses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, VolumesError};
use crate::id::VolumeId;

/// A volume as the control plane reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    pub project_id: String,
    pub size_gb: i64,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub encryption: Option<EncryptionSettings>,
    pub location: String,
    pub endpoint: String,
    pub created_at: DateTime<Utc>,
}

/// Customer-managed encryption settings of a volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionSettings {
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub key_id: Option<String>,
}

/// Body for volume creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVolumeBody {
    pub size_gb: i64,
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionSettings>,
}

/// Body for volume updates; only the provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateVolumeBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

impl UpdateVolumeBody {
    pub fn is_empty(&self) -> bool {
        self.size_gb.is_none() && self.labels.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Client for the volumes API.
#[derive(Debug, Clone)]
pub struct VolumesClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl VolumesClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, id: &VolumeId) -> String {
        format!("{}/v1/{}", self.endpoint, id)
    }

    /// Fetches a volume; `None` when it does not exist.
    pub async fn get(&self, id: &VolumeId) -> Result<Option<Volume>> {
        tracing::debug!(%id, "fetching volume");
        let response = self
            .http
            .get(self.url(id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        Ok(Some(response.json().await?))
    }

    pub async fn create(&self, id: &VolumeId, body: &CreateVolumeBody) -> Result<Volume> {
        tracing::info!(%id, size_gb = body.size_gb, "creating volume");
        let response = self
            .http
            .put(self.url(id))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn update(&self, id: &VolumeId, body: &UpdateVolumeBody) -> Result<Volume> {
        tracing::info!(%id, "updating volume");
        let response = self
            .http
            .patch(self.url(id))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(VolumesError::NotFound(id.to_string()));
        }
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Deletes a volume. Deleting a volume that is already gone succeeds.
    pub async fn delete(&self, id: &VolumeId) -> Result<()> {
        tracing::info!(%id, "deleting volume");
        let response = self
            .http
            .delete(self.url(id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(%id, "volume already absent");
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ApiError>().await {
            Ok(error) => error.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(VolumesError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
