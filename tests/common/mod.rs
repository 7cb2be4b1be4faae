//! Common test utilities for strata scenario and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated test environment with a temp working directory
//! - Fixtures: Reusable model documents

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
