//! Groundplane volumes service
//!
//! The `groundplane_volume` resource and data source, the typed REST
//! client they call, and the volume ID codec. The resource implements the
//! SDK contract once and is served over both protocol generations
//! unchanged.

pub mod client;
pub mod data_source;
pub mod error;
pub mod id;
pub mod resource;

// Re-exports
pub use client::{EncryptionSettings, Volume, VolumesClient};
pub use data_source::VolumeDataSource;
pub use error::{Result, VolumesError};
pub use id::VolumeId;
pub use resource::VolumeResource;
