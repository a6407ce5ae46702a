//! Test harness for the moondash workspace.
//!
//! [`fixtures::Scenario`] builds dashboards cell by cell, [`documents`]
//! writes them out in the collector's on-disk layout, and
//! [`logging::init_test_logging`] wires `tracing` output into the test
//! runner. The integration suite lives in `tests/`.

pub mod documents;
pub mod fixtures;
pub mod logging;

pub use fixtures::{Cell, Scenario};
