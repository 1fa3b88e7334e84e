//! Resource domain entities.

pub mod model;

pub use model::{CreateResource, Resource, ResourceFlags, ResourceFlagsUpdate};
