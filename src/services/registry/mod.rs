//! Registry service module
//!
//! This module contains the service registry implementation split into logical components:
//! - `registrar`: announcement validation and merge
//! - `resolver`: method name lookup
//! - `service`: shared service state and catalog snapshots
//! - `grpc_impl`: gRPC trait implementation

pub mod error;
pub mod grpc_impl;
pub mod registrar;
pub mod resolver;
pub mod service;

// Re-export public types for easier access
pub use error::AnnounceError;
pub use registrar::{
    AnnounceOutcome, Announcement, HEALTH_SERVICE, Registrar, SUPPORTED_API_VERSION,
};
pub use resolver::Resolver;
pub use service::MyRegistryService;
