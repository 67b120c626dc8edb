//! Groundplane resource SDK
//!
//! The typed-resource layer between resource implementations and the host
//! plugin protocol. A resource author implements one backend-agnostic
//! contract ([`Resource`] / [`DataSource`]); this crate adapts it to both
//! generations of the protocol:
//!
//! - the **legacy** generation, where configuration and state travel as
//!   loosely-typed attribute maps and changes as a diff;
//! - the **declarative** generation, where state is a structured document
//!   validated against the compiled schema.
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              resource implementation              │
//! │   impl Resource<C> { create / read / ... }        │
//! └───────────────────────┬──────────────────────────┘
//!                         │ ResourceData (one trait)
//!         ┌───────────────┴────────────────┐
//! ┌───────▼────────┐              ┌────────▼────────┐
//! │ legacy wrapper │              │ declarative     │
//! │ + adapter      │              │ wrapper+adapter │
//! └────────────────┘              └─────────────────┘
//! ```
//!
//! Contract functions receive a [`ResourceMetaData`] carrying the client
//! handle and a [`ResourceData`] bound to the in-flight lifecycle call;
//! errors they return are translated into host [`Diagnostics`], never
//! panics.

pub mod contract;
pub mod declarative_data;
pub mod diagnostics;
pub mod error;
pub mod legacy_data;
pub mod resource_data;
pub mod wrapper;
pub mod wrapper_declarative;
pub mod wrapper_legacy;

// Re-exports
pub use contract::{DataSource, Resource, ResourceMetaData};
pub use declarative_data::{DeclarativeResourceData, ID_ATTRIBUTE, StateDocument};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Result, SdkError};
pub use legacy_data::{LegacyInstanceState, LegacyResourceData};
pub use resource_data::{Operation, OperationTimeouts, ResourceData};
pub use wrapper::{data_source_schema, resource_schema};
pub use wrapper_declarative::{
    CreateRequest, DeclarativeDataSourceWrapper, DeclarativeResourceWrapper, DeleteRequest,
    ImportRequest, LifecycleResponse, ReadRequest, UpdateRequest,
};
pub use wrapper_legacy::{
    LegacyCreateRequest, LegacyDataSourceWrapper, LegacyDeleteRequest, LegacyImportRequest,
    LegacyLifecycleResponse, LegacyReadRequest, LegacyResourceWrapper, LegacyUpdateRequest,
};
