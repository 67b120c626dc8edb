//! Declarative protocol wrappers
//!
//! Adapt a typed contract to hosts speaking the structured-state protocol
//! generation. One wrapper instance serves a contract for the process
//! lifetime; every lifecycle call runs the same four stages: resolve the
//! cached schema, bind an adapter to the request, dispatch the contract
//! function under its timeout, then commit the adapter's state or translate
//! the error — never both.

use std::sync::Arc;

use crate::contract::{DataSource, Resource, ResourceMetaData};
use crate::declarative_data::{DeclarativeResourceData, StateDocument};
use crate::diagnostics::Diagnostics;
use crate::resource_data::Operation;
use crate::wrapper::{data_source_schema, dispatch, resource_schema};

pub struct CreateRequest {
    pub config: StateDocument,
}

pub struct ReadRequest {
    pub state: StateDocument,
}

pub struct UpdateRequest {
    pub config: StateDocument,
    pub prior: StateDocument,
}

pub struct DeleteRequest {
    pub state: StateDocument,
}

pub struct ImportRequest {
    pub id: String,
}

/// Response to any declarative lifecycle call: the state to persist
/// (`None` means the resource is absent) plus diagnostics. A response
/// carrying error diagnostics never mutates state.
#[derive(Debug)]
pub struct LifecycleResponse {
    pub state: Option<StateDocument>,
    pub diagnostics: Diagnostics,
}

impl LifecycleResponse {
    fn committed(state: Option<StateDocument>) -> Self {
        Self {
            state,
            diagnostics: Diagnostics::new(),
        }
    }

    fn failed(summary: &str, error: &anyhow::Error, unchanged: Option<StateDocument>) -> Self {
        Self {
            state: unchanged,
            diagnostics: Diagnostics::from_error(summary, error),
        }
    }
}

/// Serves one resource contract over the declarative protocol.
pub struct DeclarativeResourceWrapper<C> {
    resource: Arc<dyn Resource<C>>,
    client: Arc<C>,
}

impl<C: Send + Sync + 'static> DeclarativeResourceWrapper<C> {
    pub fn new(resource: Arc<dyn Resource<C>>, client: Arc<C>) -> Self {
        Self { resource, client }
    }

    /// The compiled schema served for this resource kind.
    pub fn schema(&self) -> Result<Arc<groundplane_schema::AttributeSchema>, anyhow::Error> {
        resource_schema(self.resource.as_ref()).map_err(anyhow::Error::new)
    }

    pub async fn create(&self, request: CreateRequest) -> LifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    None,
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let mut data =
            DeclarativeResourceData::for_create(schema.clone(), timeouts, request.config);
        let result = {
            let mut metadata = ResourceMetaData::new(self.client.clone(), schema, &mut data);
            dispatch(
                self.resource.type_name(),
                Operation::Create,
                timeouts.create,
                self.resource.create(&mut metadata),
            )
            .await
        };
        match result {
            Ok(()) => LifecycleResponse::committed(data.into_state()),
            // A failed create persists nothing: a retry must not find
            // partially-applied state.
            Err(error) => LifecycleResponse::failed("performing create", &error, None),
        }
    }

    pub async fn read(&self, request: ReadRequest) -> LifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    Some(request.state),
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let unchanged = request.state.clone();
        let mut data = DeclarativeResourceData::for_read(schema.clone(), timeouts, request.state);
        let result = {
            let mut metadata = ResourceMetaData::new(self.client.clone(), schema, &mut data);
            dispatch(
                self.resource.type_name(),
                Operation::Read,
                timeouts.read,
                self.resource.read(&mut metadata),
            )
            .await
        };
        match result {
            Ok(()) => LifecycleResponse::committed(data.into_state()),
            Err(error) => LifecycleResponse::failed("performing read", &error, Some(unchanged)),
        }
    }

    pub async fn update(&self, request: UpdateRequest) -> LifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    Some(request.prior),
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let unchanged = request.prior.clone();
        let mut data = DeclarativeResourceData::for_update(
            schema.clone(),
            timeouts,
            request.config,
            request.prior,
        );
        let result = {
            let mut metadata = ResourceMetaData::new(self.client.clone(), schema, &mut data);
            dispatch(
                self.resource.type_name(),
                Operation::Update,
                timeouts.update,
                self.resource.update(&mut metadata),
            )
            .await
        };
        match result {
            Ok(()) => LifecycleResponse::committed(data.into_state()),
            Err(error) => LifecycleResponse::failed("performing update", &error, Some(unchanged)),
        }
    }

    pub async fn delete(&self, request: DeleteRequest) -> LifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    Some(request.state),
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let unchanged = request.state.clone();
        let mut data = DeclarativeResourceData::for_delete(schema.clone(), timeouts, request.state);
        let result = {
            let mut metadata = ResourceMetaData::new(self.client.clone(), schema, &mut data);
            dispatch(
                self.resource.type_name(),
                Operation::Delete,
                timeouts.delete,
                self.resource.delete(&mut metadata),
            )
            .await
        };
        match result {
            Ok(()) => LifecycleResponse::committed(None),
            Err(error) => LifecycleResponse::failed("performing delete", &error, Some(unchanged)),
        }
    }

    /// Import seeds the adapter with the given identity and dispatches the
    /// contract's Read under the read timeout.
    pub async fn import(&self, request: ImportRequest) -> LifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    None,
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let mut data = DeclarativeResourceData::for_import(schema.clone(), timeouts, &request.id);
        let result = {
            let mut metadata = ResourceMetaData::new(self.client.clone(), schema, &mut data);
            dispatch(
                self.resource.type_name(),
                Operation::Import,
                timeouts.read,
                self.resource.read(&mut metadata),
            )
            .await
        };
        match result {
            Ok(()) => LifecycleResponse::committed(data.into_state()),
            Err(error) => LifecycleResponse::failed("performing import", &error, None),
        }
    }
}

/// Serves one data-source contract over the declarative protocol.
pub struct DeclarativeDataSourceWrapper<C> {
    data_source: Arc<dyn DataSource<C>>,
    client: Arc<C>,
}

impl<C: Send + Sync + 'static> DeclarativeDataSourceWrapper<C> {
    pub fn new(data_source: Arc<dyn DataSource<C>>, client: Arc<C>) -> Self {
        Self {
            data_source,
            client,
        }
    }

    pub fn schema(&self) -> Result<Arc<groundplane_schema::AttributeSchema>, anyhow::Error> {
        data_source_schema(self.data_source.as_ref()).map_err(anyhow::Error::new)
    }

    /// A data-source read follows the same shape as a resource read, with
    /// no state beyond the computed attributes.
    pub async fn read(&self, config: StateDocument) -> LifecycleResponse {
        let schema = match data_source_schema(self.data_source.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    None,
                );
            }
        };
        let timeouts = crate::resource_data::OperationTimeouts {
            read: self.data_source.read_timeout(),
            ..Default::default()
        };
        let mut data =
            DeclarativeResourceData::for_data_source_read(schema.clone(), timeouts, config);
        let result = {
            let mut metadata = ResourceMetaData::new(self.client.clone(), schema, &mut data);
            dispatch(
                self.data_source.type_name(),
                Operation::Read,
                timeouts.read,
                self.data_source.read(&mut metadata),
            )
            .await
        };
        match result {
            Ok(()) => LifecycleResponse::committed(data.into_state()),
            Err(error) => LifecycleResponse::failed("performing read", &error, None),
        }
    }
}
