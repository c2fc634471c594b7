//! Shared test utilities for logflow integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Every helper builds a private [`Router`](logflow::Router)
//! so harnesses never race each other on the shared instance.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
