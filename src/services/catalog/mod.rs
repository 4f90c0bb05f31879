//! Service catalog data model
//!
//! - `name`: validated `module.service` identifiers
//! - `types`: modules, services, instances and hosts

pub mod name;
pub mod types;

pub use name::{ComponentName, ComponentNameError};
pub use types::{Catalog, Host, Instance, Module, Service, SharedCatalog};
