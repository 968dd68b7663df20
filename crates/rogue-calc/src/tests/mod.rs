//! End-to-end tests of the calculator and the engines built on it.
//!
//! - `integration.rs`: full breakdowns for each spec and their failure modes
//! - `determinism.rs`: repeated calls give bit-identical results
//! - `properties.rs`: EP and ranking properties
//! - `helpers.rs`: characters and settings shared by the tests

mod determinism;
pub(crate) mod helpers;
mod integration;
