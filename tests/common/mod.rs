//! Common test utilities for the integration tests
//!
//! `library` builds a small literary trinity through the public API;
//! `consistency` checks secondary indexes against a from-scratch rebuild.

#![allow(dead_code)]

pub mod consistency;
pub mod library;

pub use consistency::{assert_indexes_consistent, rebuilt_snapshot};
pub use library::{library, props};
