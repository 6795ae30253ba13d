//! Custom Resource Definitions for app-operator.
//!
//! - `App`: declarative description of an application instance from which
//!   the managed Deployment, Service and Ingress are derived.

mod app;

pub use app::*;
