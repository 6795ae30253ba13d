// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Functional tests for the App reconciliation decision logic.
//!
//! These tests verify the create/update/delete decisions for the derived
//! Deployment, Service and Ingress WITHOUT requiring a live Kubernetes
//! cluster. The mock store simulates only derivative presence; every
//! decision comes from the production `gates` and `decide` functions, so
//! the tests stay in sync with production behavior automatically.
//!
//! ```bash
//! # Run all functional tests
//! cargo test --test functional
//!
//! # Run specific test
//! cargo test --test functional test_scenario_a_only_deployment
//! ```

mod filter_tests;
mod scenario_tests;

// Re-export for use in tests
pub use mock_store::*;
