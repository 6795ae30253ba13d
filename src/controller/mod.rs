//! Controller module for app-operator.
//!
//! Contains the reconciliation loop, the derivative sync decision logic,
//! error handling, and the shared reconciler context.

pub mod context;
pub mod error;
pub mod reconciler;
pub mod sync;
