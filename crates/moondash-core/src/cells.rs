//! Output handed to the presentation layer: per-cell predicate values,
//! per-package reports, and a dashboard-wide summary.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

use moondash_types::{Backend, DashboardAggregate, Phase, Platform, Toolchain};
use serde::{Deserialize, Serialize};

use crate::batch::{ParallelismConfig, diagnose_all_with};
use crate::index::ResultIndex;
use crate::order::EngineOrder;
use crate::predicate::Outcome;
use crate::reconcile::{Diagnosis, DiagnosisKind, Reconciler, Severity};

/// One (toolchain, platform, phase, backend) coordinate of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredicateCell {
    pub toolchain: Toolchain,
    pub platform: Platform,
    pub phase: Phase,
    pub backend: Backend,
    pub outcome: Outcome,
}

impl PredicateCell {
    /// The boolean status predicate at this coordinate.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.outcome.is_passed()
    }
}

/// Every cell of package `package`, toolchain-major then in engine order.
/// Platforms without a snapshot are omitted.
#[must_use]
pub fn predicate_cells(
    package: usize,
    data: &DashboardAggregate,
    order: &EngineOrder,
) -> Vec<PredicateCell> {
    let index = ResultIndex::new(data, package);
    let mut cells = Vec::new();
    for toolchain in Toolchain::ALL {
        for &platform in &order.platforms {
            if !index.has_platform(platform) {
                continue;
            }
            for &phase in &order.phases {
                for &backend in &order.backends {
                    cells.push(PredicateCell {
                        toolchain,
                        platform,
                        phase,
                        backend,
                        outcome: index.outcome(platform, toolchain, phase, backend),
                    });
                }
            }
        }
    }
    cells
}

/// Everything the presentation layer needs for one dashboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReport {
    pub index: usize,
    pub label: Option<String>,
    pub url: Option<String>,
    pub diagnosis: Diagnosis,
    pub cells: Vec<PredicateCell>,
}

/// Diagnose all packages and attach labels and cells.
#[must_use]
pub fn build_reports(
    reconciler: &Reconciler,
    data: &DashboardAggregate,
    config: ParallelismConfig,
) -> Vec<PackageReport> {
    diagnose_all_with(reconciler, data, config)
        .into_iter()
        .enumerate()
        .map(|(index, diagnosis)| {
            let source = data.source(index);
            PackageReport {
                index,
                label: source.map(|s| s.label().to_owned()),
                url: source.map(moondash_types::Source::url),
                diagnosis,
                cells: predicate_cells(index, data, reconciler.order()),
            }
        })
        .collect()
}

/// Counts of diagnoses by severity and by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_kind: BTreeMap<DiagnosisKind, usize>,
}

impl DashboardSummary {
    #[must_use]
    pub fn from_diagnoses<'a>(diagnoses: impl IntoIterator<Item = &'a Diagnosis>) -> Self {
        let mut summary = Self::default();
        for d in diagnoses {
            summary.total += 1;
            *summary.by_severity.entry(d.severity).or_default() += 1;
            *summary.by_kind.entry(d.kind).or_default() += 1;
        }
        summary
    }

    #[must_use]
    pub fn count_kind(&self, kind: DiagnosisKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.by_severity.get(&Severity::Success).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.by_severity.get(&Severity::Error).copied().unwrap_or(0)
    }

    /// Human-readable multi-line summary; kinds with zero packages are omitted.
    #[must_use]
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let verdict = if self.failed() == 0 { "PASS" } else { "FAIL" };
        let _ = writeln!(
            out,
            "{verdict}: {} packages, {} passed, {} failing",
            self.total,
            self.passed(),
            self.failed()
        );
        for kind in DiagnosisKind::ALL {
            let n = self.count_kind(kind);
            if n > 0 {
                let _ = writeln!(out, "  {:<24} {n}", kind.as_str());
            }
        }
        out
    }
}
