//! Shared wrapper plumbing
//!
//! Schema resolution with the process-lifetime cache, and the timed
//! dispatch every lifecycle call funnels through. Both backend wrappers
//! build on these.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::Lazy;

use groundplane_schema::{
    AttrKind, Attribute, AttributeSchema, SchemaError, SchemaMap, compile_schema,
};

use crate::contract::{DataSource, Resource};
use crate::declarative_data::ID_ATTRIBUTE;
use crate::error::SdkError;
use crate::resource_data::Operation;

/// Compiled schemas, keyed by contract kind and type name.
///
/// Deliberately the one piece of shared state in the SDK: each entry is
/// written at most once (contracts are registered before the first
/// lifecycle call and never change at runtime) and read-only afterwards.
static SCHEMA_CACHE: Lazy<RwLock<HashMap<String, Arc<AttributeSchema>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn resolve_schema(
    cache_key: String,
    type_name: &str,
    arguments: &SchemaMap,
    attributes: &SchemaMap,
    version: i64,
) -> Result<Arc<AttributeSchema>, SchemaError> {
    if let Some(schema) = SCHEMA_CACHE
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get(&cache_key)
    {
        return Ok(schema.clone());
    }

    let mut compiled = compile_schema(type_name, arguments, attributes, version)?;
    ensure_id_attribute(&mut compiled);
    let schema = Arc::new(compiled);

    let mut cache = SCHEMA_CACHE
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    // First writer wins; a concurrent schema request compiled the same
    // immutable result.
    Ok(cache.entry(cache_key).or_insert(schema).clone())
}

/// Every resource carries an identity attribute whether or not the
/// contract declared one; `set_id` stores identity there.
fn ensure_id_attribute(schema: &mut AttributeSchema) {
    schema
        .attributes
        .entry(ID_ATTRIBUTE.to_string())
        .or_insert_with(|| {
            let mut attribute = Attribute::new(AttrKind::String);
            attribute.computed = true;
            attribute
        });
}

/// The compiled, cached schema of a resource contract.
pub fn resource_schema<C: Send + Sync>(
    resource: &dyn Resource<C>,
) -> Result<Arc<AttributeSchema>, SchemaError> {
    resolve_schema(
        format!("resource/{}", resource.type_name()),
        resource.type_name(),
        &resource.arguments(),
        &resource.attributes(),
        resource.schema_version(),
    )
}

/// The compiled, cached schema of a data-source contract.
pub fn data_source_schema<C: Send + Sync>(
    data_source: &dyn DataSource<C>,
) -> Result<Arc<AttributeSchema>, SchemaError> {
    resolve_schema(
        format!("data/{}", data_source.type_name()),
        data_source.type_name(),
        &data_source.arguments(),
        &data_source.attributes(),
        0,
    )
}

/// Runs one contract function under its declared timeout. Exceeding the
/// timeout is a fatal operation failure, not a retryable condition.
pub(crate) async fn dispatch<F>(
    type_name: &str,
    operation: Operation,
    timeout: Duration,
    future: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    tracing::debug!(type_name, %operation, timeout_secs = timeout.as_secs(), "dispatching");
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(SdkError::OperationTimeout { operation, timeout }.into()),
    }
}
