//! Lifecycle scenarios running a demo contract through both protocol
//! generations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use groundplane_schema::{AttrMap, AttrValue, Schema, SchemaMap};
use groundplane_sdk::{
    CreateRequest, DeclarativeResourceWrapper, DeleteRequest, ImportRequest, LegacyCreateRequest,
    LegacyResourceWrapper, OperationTimeouts, ReadRequest, Resource, ResourceData,
    ResourceMetaData, StateDocument, UpdateRequest,
};

struct NullClient;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Succeed,
    Fail,
    Hang,
}

struct DemoResource {
    type_name: &'static str,
    mode: Mode,
    timeouts: OperationTimeouts,
}

impl DemoResource {
    fn succeeding() -> Self {
        Self {
            type_name: "groundplane_demo",
            mode: Mode::Succeed,
            timeouts: OperationTimeouts::default(),
        }
    }

    fn failing() -> Self {
        Self {
            mode: Mode::Fail,
            ..Self::succeeding()
        }
    }

    fn hanging() -> Self {
        Self {
            type_name: "groundplane_demo_slow",
            mode: Mode::Hang,
            timeouts: OperationTimeouts {
                create: Duration::from_millis(50),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl Resource<NullClient> for DemoResource {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn arguments(&self) -> SchemaMap {
        SchemaMap::from([("name".to_string(), Schema::string().required())])
    }

    fn attributes(&self) -> SchemaMap {
        SchemaMap::from([("location".to_string(), Schema::string().computed())])
    }

    fn timeouts(&self) -> OperationTimeouts {
        self.timeouts
    }

    async fn create(&self, metadata: &mut ResourceMetaData<'_, NullClient>) -> anyhow::Result<()> {
        match self.mode {
            Mode::Fail => anyhow::bail!("quota exceeded"),
            Mode::Hang => {
                tokio::time::sleep(Duration::from_millis(250)).await;
                Ok(())
            }
            Mode::Succeed => {
                assert!(metadata.data.is_new_resource());
                assert_eq!(metadata.get_string("name"), "demo");
                metadata.data.set("location", AttrValue::from("Berlin"))?;
                metadata.data.set_id("demo-id");
                Ok(())
            }
        }
    }

    async fn read(&self, metadata: &mut ResourceMetaData<'_, NullClient>) -> anyhow::Result<()> {
        if metadata.data.id() == "demo-id" {
            metadata.data.set("name", AttrValue::from("demo"))?;
            metadata.data.set("location", AttrValue::from("Berlin"))?;
            Ok(())
        } else {
            let id = metadata.data.id();
            metadata.mark_as_gone(&id)
        }
    }

    async fn delete(&self, _metadata: &mut ResourceMetaData<'_, NullClient>) -> anyhow::Result<()> {
        Ok(())
    }
}

fn declarative_wrapper(resource: DemoResource) -> DeclarativeResourceWrapper<NullClient> {
    DeclarativeResourceWrapper::new(Arc::new(resource), Arc::new(NullClient))
}

fn legacy_wrapper(resource: DemoResource) -> LegacyResourceWrapper<NullClient> {
    LegacyResourceWrapper::new(Arc::new(resource), Arc::new(NullClient))
}

fn demo_config() -> AttrMap {
    AttrMap::from([("name".to_string(), AttrValue::from("demo"))])
}

#[tokio::test]
async fn declarative_create_commits_state_and_identity() {
    let wrapper = declarative_wrapper(DemoResource::succeeding());
    let response = wrapper
        .create(CreateRequest {
            config: StateDocument::new(demo_config()),
        })
        .await;

    assert!(response.diagnostics.is_empty());
    let state = response.state.expect("create should commit state");
    assert_eq!(state.get_attribute("name"), AttrValue::from("demo"));
    assert_eq!(state.get_attribute("location"), AttrValue::from("Berlin"));
    assert_eq!(state.id(), "demo-id");
}

#[tokio::test]
async fn legacy_create_commits_state_and_identity() {
    let wrapper = legacy_wrapper(DemoResource::succeeding());
    let response = wrapper
        .create(LegacyCreateRequest {
            config: demo_config(),
        })
        .await;

    assert!(response.diagnostics.is_empty());
    let state = response.state.expect("create should commit state");
    assert_eq!(state.id, "demo-id");
    assert_eq!(state.attributes.get("name"), Some(&AttrValue::from("demo")));
    assert_eq!(
        state.attributes.get("location"),
        Some(&AttrValue::from("Berlin"))
    );
}

#[tokio::test]
async fn failed_create_reports_one_diagnostic_and_no_state() {
    let wrapper = declarative_wrapper(DemoResource::failing());
    let response = wrapper
        .create(CreateRequest {
            config: StateDocument::new(demo_config()),
        })
        .await;

    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.len(), 1);
    let diagnostic = response.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.summary, "performing create");
    assert!(diagnostic.detail.contains("quota exceeded"));
}

#[tokio::test]
async fn timed_out_create_fails_with_no_commit() {
    let wrapper = declarative_wrapper(DemoResource::hanging());
    let response = wrapper
        .create(CreateRequest {
            config: StateDocument::new(demo_config()),
        })
        .await;

    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.len(), 1);
    let diagnostic = response.diagnostics.iter().next().unwrap();
    assert!(
        diagnostic.detail.contains("did not complete within"),
        "unexpected detail: {}",
        diagnostic.detail
    );
}

#[tokio::test]
async fn unimplemented_update_fails_closed() {
    let wrapper = declarative_wrapper(DemoResource::succeeding());
    let mut prior = StateDocument::new(demo_config());
    prior = {
        let mut data = prior.values().clone();
        data.insert("id".to_string(), AttrValue::from("demo-id"));
        StateDocument::new(data)
    };

    let response = wrapper
        .update(UpdateRequest {
            config: StateDocument::new(demo_config()),
            prior: prior.clone(),
        })
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    let diagnostic = response.diagnostics.iter().next().unwrap();
    assert!(diagnostic.detail.contains("not supported"));
    // State must be left exactly as it was before the call.
    assert_eq!(response.state, Some(prior));
}

#[tokio::test]
async fn delete_removes_state() {
    let wrapper = declarative_wrapper(DemoResource::succeeding());
    let response = wrapper
        .delete(DeleteRequest {
            state: StateDocument::new(demo_config()),
        })
        .await;

    assert!(response.diagnostics.is_empty());
    assert!(response.state.is_none());
}

#[tokio::test]
async fn import_seeds_identity_and_runs_read() {
    let wrapper = declarative_wrapper(DemoResource::succeeding());
    let response = wrapper
        .import(ImportRequest {
            id: "demo-id".to_string(),
        })
        .await;

    assert!(response.diagnostics.is_empty());
    let state = response.state.expect("import should produce state");
    assert_eq!(state.id(), "demo-id");
    assert_eq!(state.get_attribute("name"), AttrValue::from("demo"));
}

#[tokio::test]
async fn read_of_a_vanished_resource_drops_it_from_state() {
    let wrapper = declarative_wrapper(DemoResource::succeeding());
    let mut values = demo_config();
    values.insert("id".to_string(), AttrValue::from("gone-id"));

    let response = wrapper
        .read(ReadRequest {
            state: StateDocument::new(values),
        })
        .await;

    assert!(response.diagnostics.is_empty());
    assert!(response.state.is_none());
}
