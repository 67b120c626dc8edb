//! Provider configuration
//!
//! The provider block's arguments and their resolution. Values are taken
//! from explicit configuration first, then from environment variables;
//! credentials that resolve to nothing are an error up front rather than a
//! failed remote call later.

use groundplane_schema::{Schema, SchemaMap};

use crate::error::{ProviderError, Result};

const DEFAULT_ENDPOINT: &str = "https://api.groundplane.dev";

const ENDPOINT_ENV: &str = "GROUNDPLANE_ENDPOINT";
const TOKEN_ENV: &str = "GROUNDPLANE_TOKEN";
const PROJECT_ENV: &str = "GROUNDPLANE_PROJECT";
const ZONE_ENV: &str = "GROUNDPLANE_ZONE";

/// Argument schema of the provider block.
pub fn provider_schema() -> SchemaMap {
    SchemaMap::from([
        (
            "endpoint".to_string(),
            Schema::string()
                .optional()
                .with_description("Base URL of the control plane API."),
        ),
        (
            "token".to_string(),
            Schema::string()
                .optional()
                .sensitive()
                .with_description("API token used to authenticate."),
        ),
        (
            "project".to_string(),
            Schema::string()
                .optional()
                .with_description("Default project resources are created in."),
        ),
        (
            "zone".to_string(),
            Schema::string()
                .optional()
                .with_description("Default zone for zonal resources."),
        ),
    ])
}

/// Resolved provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub token: String,
    pub project: String,
    pub zone: Option<String>,
}

impl ProviderConfig {
    /// Resolves the configuration from explicit values with environment
    /// fallbacks.
    pub fn resolve(
        endpoint: Option<String>,
        token: Option<String>,
        project: Option<String>,
        zone: Option<String>,
    ) -> Result<Self> {
        let endpoint = endpoint
            .or_else(|| env_non_empty(ENDPOINT_ENV))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let token = token
            .or_else(|| env_non_empty(TOKEN_ENV))
            .ok_or(ProviderError::MissingToken)?;
        let project = project
            .or_else(|| env_non_empty(PROJECT_ENV))
            .ok_or(ProviderError::MissingProject)?;
        let zone = zone.or_else(|| env_non_empty(ZONE_ENV));

        tracing::debug!(%endpoint, %project, "resolved provider configuration");
        Ok(Self {
            endpoint,
            token,
            project,
            zone,
        })
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn explicit_values_win() {
        let config = ProviderConfig::resolve(
            Some("https://api.example.test".to_string()),
            Some("tok".to_string()),
            Some("acme".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(config.endpoint, "https://api.example.test");
        assert_eq!(config.project, "acme");
        assert_eq!(config.zone, None);
    }

    #[test]
    #[serial]
    fn missing_token_is_an_error() {
        // SAFETY: tests touching the environment run serialized.
        unsafe { std::env::remove_var(TOKEN_ENV) };
        let err =
            ProviderConfig::resolve(None, None, Some("acme".to_string()), None).unwrap_err();
        assert!(matches!(err, ProviderError::MissingToken));
    }

    #[test]
    #[serial]
    fn environment_fills_the_gaps() {
        // SAFETY: tests touching the environment run serialized.
        unsafe {
            std::env::set_var(TOKEN_ENV, "env-token");
            std::env::set_var(PROJECT_ENV, "env-project");
            std::env::remove_var(ENDPOINT_ENV);
        }
        let config = ProviderConfig::resolve(None, None, None, None).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.token, "env-token");
        assert_eq!(config.project, "env-project");
        // SAFETY: tests touching the environment run serialized.
        unsafe {
            std::env::remove_var(TOKEN_ENV);
            std::env::remove_var(PROJECT_ENV);
        }
    }

    #[test]
    fn schema_marks_the_token_sensitive() {
        let schema = provider_schema();
        assert!(schema.get("token").unwrap().sensitive);
        assert!(schema.get("endpoint").unwrap().optional);
    }
}
