//! The reconciliation engine.
//!
//! # Decision list
//!
//! [`Reconciler::diagnose`] evaluates an ordered list of rules for one
//! package; the first rule that fires produces the [`Diagnosis`]:
//!
//! 1. all-pass gate (universal over versions, phases, backends)
//! 2. toolchain regression: stable passed, bleeding failed, same platform
//! 3. platform inconsistency (stable, then bleeding)
//! 4. backend inconsistency (stable, then bleeding)
//! 5. phase inconsistency (stable, then bleeding)
//! 6. other failure: results were recorded but fit no pattern
//! 7. no data: no result was recorded for the package at all
//!
//! Ties inside a rule are broken by [`EngineOrder`]. The regression rule is
//! directional: bleeding passing where stable failed is not a regression.
//!
//! Cells that were never attempted take no part in rules 2 through 5, so a
//! missing entry can never be reported as a failure.

use std::fmt;

use moondash_types::{DashboardAggregate, Platform, Toolchain};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::index::ResultIndex;
use crate::order::EngineOrder;
use crate::predicate::{self, Outcome};

// ---------------------------------------------------------------------------
// Diagnosis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    /// Reserved for presentation; no rule currently produces it.
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule of the decision list produced a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisKind {
    AllPassed,
    ToolchainRegression,
    PlatformInconsistency,
    BackendInconsistency,
    PhaseInconsistency,
    OtherFailure,
    NoData,
}

impl DiagnosisKind {
    /// All kinds, in rule order.
    pub const ALL: [Self; 7] = [
        Self::AllPassed,
        Self::ToolchainRegression,
        Self::PlatformInconsistency,
        Self::BackendInconsistency,
        Self::PhaseInconsistency,
        Self::OtherFailure,
        Self::NoData,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllPassed => "all_passed",
            Self::ToolchainRegression => "toolchain_regression",
            Self::PlatformInconsistency => "platform_inconsistency",
            Self::BackendInconsistency => "backend_inconsistency",
            Self::PhaseInconsistency => "phase_inconsistency",
            Self::OtherFailure => "other_failure",
            Self::NoData => "no_data",
        }
    }
}

impl fmt::Display for DiagnosisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sentence explaining a package's pass/fail pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnosis {
    pub text: String,
    pub severity: Severity,
    pub kind: DiagnosisKind,
}

impl Diagnosis {
    fn new(kind: DiagnosisKind, severity: Severity, text: String) -> Self {
        Self {
            text,
            severity,
            kind,
        }
    }

    #[must_use]
    pub fn all_passed() -> Self {
        Self::new(DiagnosisKind::AllPassed, Severity::Success, "All passed".to_owned())
    }

    #[must_use]
    pub fn other_failure() -> Self {
        Self::new(DiagnosisKind::OtherFailure, Severity::Error, "Other failure".to_owned())
    }

    #[must_use]
    pub fn no_data() -> Self {
        Self::new(DiagnosisKind::NoData, Severity::Error, "No data available".to_owned())
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.severity, Severity::Success)
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless evaluator of the decision list under a fixed [`EngineOrder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciler {
    order: EngineOrder,
}

impl Reconciler {
    #[must_use]
    pub const fn new(order: EngineOrder) -> Self {
        Self { order }
    }

    #[must_use]
    pub const fn order(&self) -> &EngineOrder {
        &self.order
    }

    /// Diagnose package `package`. Pure: the same inputs always yield the
    /// same diagnosis.
    #[must_use]
    pub fn diagnose(&self, package: usize, data: &DashboardAggregate) -> Diagnosis {
        let index = ResultIndex::new(data, package);
        let stable_green = self.all_success(&index, Toolchain::Stable);
        let bleeding_green = self.all_success(&index, Toolchain::Bleeding);

        let diagnosis = if stable_green && bleeding_green {
            Diagnosis::all_passed()
        } else {
            self.toolchain_regression(&index)
                .or_else(|| self.platform_inconsistency(&index))
                .or_else(|| self.backend_inconsistency(&index))
                .or_else(|| self.phase_inconsistency(&index))
                .unwrap_or_else(|| {
                    if self.has_any_result(&index) {
                        Diagnosis::other_failure()
                    } else {
                        Diagnosis::no_data()
                    }
                })
        };

        debug!(
            package,
            kind = diagnosis.kind.as_str(),
            severity = diagnosis.severity.as_str(),
            "diagnosed package"
        );
        diagnosis
    }

    /// Rule 1 gate for one toolchain: every platform with a snapshot holds a
    /// fully green entry, and at least one platform has a snapshot. A
    /// missing entry on a present platform counts like absent CBTs.
    fn all_success(&self, index: &ResultIndex<'_>, toolchain: Toolchain) -> bool {
        let mut seen = false;
        for &platform in &self.order.platforms {
            if !index.has_platform(platform) {
                continue;
            }
            seen = true;
            let green = index.entry(platform, toolchain).is_some_and(|entry| {
                predicate::fully_green(entry, index.expected_versions(platform), &self.order)
            });
            if !green {
                trace!(package = index.package(), %platform, %toolchain, "entry not green");
                return false;
            }
        }
        seen
    }

    /// Rule 2.
    fn toolchain_regression(&self, index: &ResultIndex<'_>) -> Option<Diagnosis> {
        for &platform in &self.order.platforms {
            for &phase in &self.order.phases {
                for &backend in &self.order.backends {
                    let stable = index.outcome(platform, Toolchain::Stable, phase, backend);
                    let bleeding = index.outcome(platform, Toolchain::Bleeding, phase, backend);
                    if stable == Outcome::Passed && bleeding == Outcome::Failed {
                        debug!(package = index.package(), rule = 2, %platform, %phase, %backend, "toolchain regression");
                        return Some(Diagnosis::new(
                            DiagnosisKind::ToolchainRegression,
                            Severity::Error,
                            format!(
                                "Regression detected: {backend} {phase} passed in stable but failed in bleeding"
                            ),
                        ));
                    }
                }
            }
        }
        None
    }

    /// Rule 3: same toolchain, phase, and backend; different platforms.
    fn platform_inconsistency(&self, index: &ResultIndex<'_>) -> Option<Diagnosis> {
        for toolchain in Toolchain::ALL {
            for &phase in &self.order.phases {
                for &backend in &self.order.backends {
                    let (passed, failed) = partition(&self.order.platforms, |platform: Platform| {
                        index.outcome(platform, toolchain, phase, backend)
                    });
                    if !passed.is_empty() && !failed.is_empty() {
                        debug!(package = index.package(), rule = 3, %toolchain, %phase, %backend, "platform inconsistency");
                        return Some(Diagnosis::new(
                            DiagnosisKind::PlatformInconsistency,
                            Severity::Error,
                            format!(
                                "Platform inconsistency: {backend} {phase} passed on {} but failed on {}",
                                join(&passed),
                                join(&failed)
                            ),
                        ));
                    }
                }
            }
        }
        None
    }

    /// Rule 4: same toolchain, platform, and phase; different backends.
    fn backend_inconsistency(&self, index: &ResultIndex<'_>) -> Option<Diagnosis> {
        for toolchain in Toolchain::ALL {
            for &platform in &self.order.platforms {
                for &phase in &self.order.phases {
                    let (passed, failed) = partition(&self.order.backends, |backend| {
                        index.outcome(platform, toolchain, phase, backend)
                    });
                    if !passed.is_empty() && !failed.is_empty() {
                        debug!(package = index.package(), rule = 4, %toolchain, %platform, %phase, "backend inconsistency");
                        return Some(Diagnosis::new(
                            DiagnosisKind::BackendInconsistency,
                            Severity::Error,
                            format!(
                                "Backend inconsistency: {phase} passed on {} but failed on {}",
                                join(&passed),
                                join(&failed)
                            ),
                        ));
                    }
                }
            }
        }
        None
    }

    /// Rule 5: same toolchain, platform, and backend; different phases.
    fn phase_inconsistency(&self, index: &ResultIndex<'_>) -> Option<Diagnosis> {
        for toolchain in Toolchain::ALL {
            for &platform in &self.order.platforms {
                for &backend in &self.order.backends {
                    let (passed, failed) = partition(&self.order.phases, |phase| {
                        index.outcome(platform, toolchain, phase, backend)
                    });
                    if !passed.is_empty() && !failed.is_empty() {
                        debug!(package = index.package(), rule = 5, %toolchain, %platform, %backend, "phase inconsistency");
                        return Some(Diagnosis::new(
                            DiagnosisKind::PhaseInconsistency,
                            Severity::Error,
                            format!(
                                "Phase inconsistency: passed {} but failed {}",
                                join(&passed),
                                join(&failed)
                            ),
                        ));
                    }
                }
            }
        }
        None
    }

    /// Separates rule 6 from rule 7: rule 7 is left for packages with no
    /// recorded result on any present platform or toolchain.
    fn has_any_result(&self, index: &ResultIndex<'_>) -> bool {
        self.order.platforms.iter().any(|&platform| {
            Toolchain::ALL.into_iter().any(|toolchain| {
                index
                    .entry(platform, toolchain)
                    .is_some_and(|entry| predicate::has_recorded_result(entry, &self.order))
            })
        })
    }
}

/// Diagnose one package with the canonical order.
#[must_use]
pub fn diagnose(package: usize, data: &DashboardAggregate) -> Diagnosis {
    Reconciler::default().diagnose(package, data)
}

/// Split `items` into those that passed and those that failed, in order.
/// Unattempted items land in neither list.
fn partition<T: Copy>(items: &[T], mut outcome: impl FnMut(T) -> Outcome) -> (Vec<T>, Vec<T>) {
    let mut passed = Vec::new();
    let mut failed = Vec::new();
    for &item in items {
        match outcome(item) {
            Outcome::Passed => passed.push(item),
            Outcome::Failed => failed.push(item),
            Outcome::NotAttempted => {}
        }
    }
    (passed, failed)
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
