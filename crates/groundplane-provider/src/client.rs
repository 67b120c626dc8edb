//! Aggregated client handle
//!
//! One `Client` bundles every per-service API client, built from the
//! resolved provider configuration and a shared HTTP client. Contract
//! functions receive it through `ResourceMetaData` and reach their service
//! client via `AsRef`.

use std::time::Duration;

use groundplane_volumes::VolumesClient;

use crate::config::ProviderConfig;
use crate::error::Result;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-service API clients plus the provider-level defaults.
#[derive(Debug, Clone)]
pub struct Client {
    pub volumes: VolumesClient,
    pub project: String,
    pub zone: Option<String>,
}

impl Client {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("groundplane/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            volumes: VolumesClient::new(http, config.endpoint.clone(), config.token.clone()),
            project: config.project.clone(),
            zone: config.zone.clone(),
        })
    }
}

impl AsRef<VolumesClient> for Client {
    fn as_ref(&self) -> &VolumesClient {
        &self.volumes
    }
}
