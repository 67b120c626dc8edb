//! Legacy protocol wrappers
//!
//! Adapt a typed contract to hosts speaking the map/diff-based protocol
//! generation. Same four stages as the declarative wrappers; only the
//! state representation on the wire differs.

use std::sync::Arc;

use groundplane_schema::AttrMap;

use crate::contract::{DataSource, Resource, ResourceMetaData};
use crate::diagnostics::Diagnostics;
use crate::legacy_data::{LegacyInstanceState, LegacyResourceData};
use crate::resource_data::Operation;
use crate::wrapper::{data_source_schema, dispatch, resource_schema};

pub struct LegacyCreateRequest {
    pub config: AttrMap,
}

pub struct LegacyReadRequest {
    pub state: LegacyInstanceState,
}

pub struct LegacyUpdateRequest {
    pub config: AttrMap,
    pub prior: LegacyInstanceState,
}

pub struct LegacyDeleteRequest {
    pub state: LegacyInstanceState,
}

pub struct LegacyImportRequest {
    pub id: String,
}

/// Response to any legacy lifecycle call. `None` state means the resource
/// is absent; a response carrying error diagnostics never mutates state.
#[derive(Debug)]
pub struct LegacyLifecycleResponse {
    pub state: Option<LegacyInstanceState>,
    pub diagnostics: Diagnostics,
}

impl LegacyLifecycleResponse {
    fn committed(state: Option<LegacyInstanceState>) -> Self {
        Self {
            state,
            diagnostics: Diagnostics::new(),
        }
    }

    fn failed(
        summary: &str,
        error: &anyhow::Error,
        unchanged: Option<LegacyInstanceState>,
    ) -> Self {
        Self {
            state: unchanged,
            diagnostics: Diagnostics::from_error(summary, error),
        }
    }
}

/// Serves one resource contract over the legacy protocol.
pub struct LegacyResourceWrapper<C> {
    resource: Arc<dyn Resource<C>>,
    client: Arc<C>,
}

impl<C: Send + Sync + 'static> LegacyResourceWrapper<C> {
    pub fn new(resource: Arc<dyn Resource<C>>, client: Arc<C>) -> Self {
        Self { resource, client }
    }

    pub fn schema(&self) -> Result<Arc<groundplane_schema::AttributeSchema>, anyhow::Error> {
        resource_schema(self.resource.as_ref()).map_err(anyhow::Error::new)
    }

    pub async fn create(&self, request: LegacyCreateRequest) -> LegacyLifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LegacyLifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    None,
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let mut data = LegacyResourceData::for_create(schema.clone(), timeouts, request.config);
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
            Ok(()) => LegacyLifecycleResponse::committed(data.into_state()),
            Err(error) => LegacyLifecycleResponse::failed("performing create", &error, None),
        }
    }

    pub async fn read(&self, request: LegacyReadRequest) -> LegacyLifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LegacyLifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    Some(request.state),
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let unchanged = request.state.clone();
        let mut data = LegacyResourceData::for_read(schema.clone(), timeouts, request.state);
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
            Ok(()) => LegacyLifecycleResponse::committed(data.into_state()),
            Err(error) => {
                LegacyLifecycleResponse::failed("performing read", &error, Some(unchanged))
            }
        }
    }

    pub async fn update(&self, request: LegacyUpdateRequest) -> LegacyLifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LegacyLifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    Some(request.prior),
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let unchanged = request.prior.clone();
        let mut data =
            LegacyResourceData::for_update(schema.clone(), timeouts, request.config, request.prior);
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
            Ok(()) => LegacyLifecycleResponse::committed(data.into_state()),
            Err(error) => {
                LegacyLifecycleResponse::failed("performing update", &error, Some(unchanged))
            }
        }
    }

    pub async fn delete(&self, request: LegacyDeleteRequest) -> LegacyLifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LegacyLifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    Some(request.state),
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let unchanged = request.state.clone();
        let mut data = LegacyResourceData::for_delete(schema.clone(), timeouts, request.state);
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
            Ok(()) => LegacyLifecycleResponse::committed(None),
            Err(error) => {
                LegacyLifecycleResponse::failed("performing delete", &error, Some(unchanged))
            }
        }
    }

    pub async fn import(&self, request: LegacyImportRequest) -> LegacyLifecycleResponse {
        let schema = match resource_schema(self.resource.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LegacyLifecycleResponse::failed(
                    "compiling schema",
                    &anyhow::Error::new(error),
                    None,
                );
            }
        };
        let timeouts = self.resource.timeouts();
        let mut data = LegacyResourceData::for_import(schema.clone(), timeouts, request.id);
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
            Ok(()) => LegacyLifecycleResponse::committed(data.into_state()),
            Err(error) => LegacyLifecycleResponse::failed("performing import", &error, None),
        }
    }
}

/// Serves one data-source contract over the legacy protocol.
pub struct LegacyDataSourceWrapper<C> {
    data_source: Arc<dyn DataSource<C>>,
    client: Arc<C>,
}

impl<C: Send + Sync + 'static> LegacyDataSourceWrapper<C> {
    pub fn new(data_source: Arc<dyn DataSource<C>>, client: Arc<C>) -> Self {
        Self {
            data_source,
            client,
        }
    }

    pub fn schema(&self) -> Result<Arc<groundplane_schema::AttributeSchema>, anyhow::Error> {
        data_source_schema(self.data_source.as_ref()).map_err(anyhow::Error::new)
    }

    pub async fn read(&self, config: AttrMap) -> LegacyLifecycleResponse {
        let schema = match data_source_schema(self.data_source.as_ref()) {
            Ok(schema) => schema,
            Err(error) => {
                return LegacyLifecycleResponse::failed(
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
        let mut data = LegacyResourceData::for_data_source_read(schema.clone(), timeouts, config);
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
            Ok(()) => LegacyLifecycleResponse::committed(data.into_state()),
            Err(error) => LegacyLifecycleResponse::failed("performing read", &error, None),
        }
    }
}
