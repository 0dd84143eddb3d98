//! Common test utilities for the integration suite.
//!
//! Provides an in-process mock of the vault's admin endpoint and fixtures
//! for building assemblers and identity provider records.

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod mock_admin;

pub use fixtures::*;
pub use mock_admin::{MockAdmin, MockBehavior};
