//! Provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(
        "no API token configured. Set the `token` provider argument or the GROUNDPLANE_TOKEN environment variable"
    )]
    MissingToken,

    #[error(
        "no project configured. Set the `project` provider argument or the GROUNDPLANE_PROJECT environment variable"
    )]
    MissingProject,

    #[error("a {kind} named {name:?} is already registered")]
    DuplicateType { kind: &'static str, name: String },

    #[error("building the HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("schema error: {0}")]
    Schema(#[from] groundplane_schema::SchemaError),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
