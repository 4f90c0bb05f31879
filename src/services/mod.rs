pub mod catalog;
pub mod client;
pub mod registry;

pub use catalog::{Catalog, ComponentName, SharedCatalog};
pub use client::{RegistryClient, RegistryClientConfig, RegistryClientError};
pub use registry::{AnnounceError, MyRegistryService, Registrar, Resolver};
