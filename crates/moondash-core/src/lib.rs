//! Reconciliation engine for the build dashboard.
//!
//! Given a [`DashboardAggregate`](moondash_types::DashboardAggregate), the
//! engine explains per package why stable and bleeding results diverge
//! across platform, backend, and phase. Everything here is a pure function
//! of the aggregate; nothing is cached between calls.

pub mod batch;
pub mod cells;
pub mod index;
pub mod order;
pub mod predicate;
pub mod reconcile;

pub use batch::{ParallelismConfig, ParallelismProfile, diagnose_all, diagnose_all_with};
pub use cells::{DashboardSummary, PackageReport, PredicateCell, build_reports, predicate_cells};
pub use index::ResultIndex;
pub use order::EngineOrder;
pub use predicate::{Outcome, succeeded};
pub use reconcile::{Diagnosis, DiagnosisKind, Reconciler, Severity, diagnose};
