//! Public API facade for moondash.
//!
//! Re-exports the report model, the reconciliation engine, and the local
//! ingestion adapter under one crate.

pub use moondash_core::{
    DashboardSummary, Diagnosis, DiagnosisKind, EngineOrder, Outcome, PackageReport,
    ParallelismConfig, ParallelismProfile, PredicateCell, Reconciler, ResultIndex, Severity,
    build_reports, diagnose, diagnose_all, diagnose_all_with, predicate_cells, succeeded,
};
pub use moondash_error::{DashboardError, Result};
pub use moondash_ingest::{SnapshotPaths, discover, load_aggregate, load_snapshot, parse_snapshot};
pub use moondash_types::{
    Backend, BuildEntry, Cbt, DashboardAggregate, ExecuteResult, Phase, Platform, ReportSnapshot,
    Source, Status, Toolchain,
};
pub use {moondash_core, moondash_ingest, moondash_types};
