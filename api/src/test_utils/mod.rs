//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//! Handler and end-to-end tests wire these into `AppState` through its
//! trait-object fields.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
