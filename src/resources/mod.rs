//! Derived-resource generation for App.
//!
//! Pure builders for the three managed resources plus the owner-binding
//! helper. Builders take the parent spec and produce fully populated desired
//! objects with no side effects; ownership is attached separately so the
//! cluster garbage collector can cascade-delete derivatives with the parent.

pub mod common;
pub mod deployment;
pub mod ingress;
pub mod service;

pub use common::{bind_owner, owner_reference, selector_labels, standard_labels};
pub use deployment::generate_deployment;
pub use ingress::generate_ingress;
pub use service::generate_service;

/// Port the workload container listens on.
pub const HTTP_PORT: i32 = 80;
