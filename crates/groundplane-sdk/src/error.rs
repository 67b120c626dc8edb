//! SDK error types

use std::time::Duration;

use groundplane_schema::SchemaError;
use thiserror::Error;

use crate::resource_data::Operation;

/// Errors raised by the SDK core.
///
/// Errors returned by contract functions themselves (including anything the
/// remote control plane produced) stay opaque [`anyhow::Error`] values and
/// pass through to diagnostics unchanged.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("writing attribute {key:?} to state: {source}")]
    StateWrite {
        key: String,
        #[source]
        source: SchemaError,
    },

    #[error("{operation} did not complete within the allowed {timeout:?}")]
    OperationTimeout {
        operation: Operation,
        timeout: Duration,
    },

    #[error("{0} is not supported by this resource")]
    NotImplemented(&'static str),

    #[error(
        "a resource with the ID {id:?} already exists - to manage it with {type_name} it must be imported first"
    )]
    ResourceRequiresImport { type_name: String, id: String },

    #[error("compiling schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("decoding the resource model from state: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("encoding the resource model into state: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SdkError>;
