//! Domain Entities
//!
//! - `Model` - Desired or rebuilt tree of regions, hosts and components
//! - `ResourceState` - Persisted record of one applied host or component
//! - `Label` - Status record of an instance

mod label;
mod model;
mod resource;

pub use label::{InstanceState, Label};
pub use model::{Component, Host, Model, Region, DEFAULT_REGION};
pub use resource::{
    component_resource_id, split_resource_id, ResourceKind, ResourceState, ResourceStatus,
    META_COMPONENT_ID, META_COMPONENT_TYPE, META_HOST_ID, META_INSTANCE_TYPE, META_REGION_ID,
};
