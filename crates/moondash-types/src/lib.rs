//! Typed report model for the build dashboard.
//!
//! A [`ReportSnapshot`] is one platform's collector run; a
//! [`DashboardAggregate`] bundles up to three of them. Both are pure data.

pub mod aggregate;
pub mod axis;
pub mod report;

pub use aggregate::DashboardAggregate;
pub use axis::{Backend, Phase, Platform, Toolchain};
pub use report::{
    BackendState, BuildEntry, Cbt, ExecuteResult, ReportSnapshot, Source, Status, ToolchainLabel,
    ToolchainVersion,
};
