//! Instanced groups that make up the tree and how they are populated

pub mod group;
pub mod builder;

pub use group::{GroupKind, InstanceGroup, InstanceTransform};
pub use builder::{GroupRecipe, build_apex_group, build_group, populate_group};
