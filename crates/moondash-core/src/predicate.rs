//! Per-entry status predicates.
//!
//! [`succeeded`] is existential over versions: a phase/backend pair passes
//! for an entry if any tracked version passed it. [`fully_green`] is the
//! universal counterpart used only by the all-pass gate.

use moondash_types::{Backend, BuildEntry, Phase, Status};
use serde::{Deserialize, Serialize};

use crate::order::EngineOrder;

/// Tri-state reading of one (entry, phase, backend) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// At least one version recorded a success.
    Passed,
    /// Some version recorded a failure and none succeeded.
    Failed,
    /// Nothing was recorded: no entry, no CBT, no result, or only skips.
    NotAttempted,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::NotAttempted => "not_attempted",
        }
    }

    #[must_use]
    pub const fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Did `phase` on `backend` succeed for any tracked version of `entry`?
#[must_use]
pub fn succeeded(entry: &BuildEntry, phase: Phase, backend: Backend) -> bool {
    entry.results(phase, backend).any(|r| r.is_success())
}

/// Classify one cell. A missing entry is [`Outcome::NotAttempted`].
#[must_use]
pub fn outcome(entry: Option<&BuildEntry>, phase: Phase, backend: Backend) -> Outcome {
    let Some(entry) = entry else {
        return Outcome::NotAttempted;
    };
    let mut failed = false;
    for result in entry.results(phase, backend) {
        match result.status {
            Status::Success => return Outcome::Passed,
            Status::Failure => failed = true,
            Status::Skipped => {}
        }
    }
    if failed {
        Outcome::Failed
    } else {
        Outcome::NotAttempted
    }
}

/// Every version position holds a CBT whose every phase/backend result is
/// present and not a failure, with at least one success overall.
///
/// Positions run up to the longer of `expected_versions` and the recorded
/// CBT count, so a short `cbts` vector is not green.
#[must_use]
pub fn fully_green(entry: &BuildEntry, expected_versions: usize, order: &EngineOrder) -> bool {
    let positions = expected_versions.max(entry.cbts.len());
    if positions == 0 {
        return false;
    }
    let mut any_success = false;
    for version in 0..positions {
        let Some(cbt) = entry.cbt(version) else {
            return false;
        };
        for &phase in &order.phases {
            for &backend in &order.backends {
                match cbt.result(phase, backend).map(|r| r.status) {
                    Some(Status::Success) => any_success = true,
                    Some(Status::Skipped) => {}
                    Some(Status::Failure) | None => return false,
                }
            }
        }
    }
    any_success
}

/// Whether any version of `entry` holds a result of any status for a
/// phase/backend pair in `order`.
#[must_use]
pub fn has_recorded_result(entry: &BuildEntry, order: &EngineOrder) -> bool {
    order.phases.iter().any(|&phase| {
        order
            .backends
            .iter()
            .any(|&backend| entry.results(phase, backend).next().is_some())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use moondash_types::{Cbt, ExecuteResult};

    fn cbt_all(status: Status) -> Cbt {
        let mut cbt = Cbt::default();
        for phase in Phase::ALL {
            for backend in Backend::ALL {
                *cbt.phase_mut(phase).result_mut(backend) = Some(ExecuteResult::with_status(status));
            }
        }
        cbt
    }

    fn set(cbt: &mut Cbt, phase: Phase, backend: Backend, status: Status) {
        *cbt.phase_mut(phase).result_mut(backend) = Some(ExecuteResult::with_status(status));
    }

    #[test]
    fn any_version_success_counts() {
        let mut v0 = cbt_all(Status::Success);
        set(&mut v0, Phase::Test, Backend::WasmGc, Status::Failure);
        let v1 = cbt_all(Status::Success);
        let entry = BuildEntry {
            source: 0,
            cbts: vec![Some(v0), Some(v1)],
        };
        assert!(succeeded(&entry, Phase::Test, Backend::WasmGc));
        assert_eq!(outcome(Some(&entry), Phase::Test, Backend::WasmGc), Outcome::Passed);
    }

    #[test]
    fn absent_cbts_are_not_attempted() {
        let entry = BuildEntry {
            source: 0,
            cbts: vec![None, None],
        };
        assert!(!succeeded(&entry, Phase::Build, Backend::Js));
        assert_eq!(outcome(Some(&entry), Phase::Build, Backend::Js), Outcome::NotAttempted);
        assert_eq!(outcome(None, Phase::Build, Backend::Js), Outcome::NotAttempted);
        assert!(!has_recorded_result(&entry, &EngineOrder::canonical()));
        assert!(!has_recorded_result(
            &BuildEntry {
                source: 0,
                cbts: vec![Some(Cbt::default())],
            },
            &EngineOrder::canonical()
        ));
    }

    #[test]
    fn failure_without_success_is_failed() {
        let entry = BuildEntry {
            source: 0,
            cbts: vec![None, Some(cbt_all(Status::Failure))],
        };
        assert_eq!(outcome(Some(&entry), Phase::Check, Backend::Wasm), Outcome::Failed);
        assert!(has_recorded_result(&entry, &EngineOrder::canonical()));
    }

    #[test]
    fn skipped_only_is_not_attempted() {
        let entry = BuildEntry {
            source: 0,
            cbts: vec![Some(cbt_all(Status::Skipped))],
        };
        assert_eq!(outcome(Some(&entry), Phase::Test, Backend::Js), Outcome::NotAttempted);
        // A skip is still a recorded result.
        assert!(has_recorded_result(&entry, &EngineOrder::canonical()));
    }

    #[test]
    fn fully_green_is_universal() {
        let order = EngineOrder::canonical();
        let green = BuildEntry {
            source: 0,
            cbts: vec![Some(cbt_all(Status::Success)), Some(cbt_all(Status::Success))],
        };
        assert!(fully_green(&green, 2, &order));
        // A third expected version with no CBT breaks the gate.
        assert!(!fully_green(&green, 3, &order));

        let mut v1 = cbt_all(Status::Success);
        set(&mut v1, Phase::Build, Backend::Js, Status::Failure);
        let mixed = BuildEntry {
            source: 0,
            cbts: vec![Some(cbt_all(Status::Success)), Some(v1)],
        };
        assert!(!fully_green(&mixed, 2, &order));

        let mut partial = cbt_all(Status::Success);
        *partial.phase_mut(Phase::Check).result_mut(Backend::Wasm) = None;
        let holed = BuildEntry {
            source: 0,
            cbts: vec![Some(partial)],
        };
        assert!(!fully_green(&holed, 1, &order));
    }

    #[test]
    fn fully_green_tolerates_skips_but_needs_a_success() {
        let order = EngineOrder::canonical();
        let mut cbt = cbt_all(Status::Success);
        set(&mut cbt, Phase::Test, Backend::Js, Status::Skipped);
        let entry = BuildEntry {
            source: 0,
            cbts: vec![Some(cbt)],
        };
        assert!(fully_green(&entry, 1, &order));

        let skipped = BuildEntry {
            source: 0,
            cbts: vec![Some(cbt_all(Status::Skipped))],
        };
        assert!(!fully_green(&skipped, 1, &order));

        let empty = BuildEntry {
            source: 0,
            cbts: Vec::new(),
        };
        assert!(!fully_green(&empty, 0, &order));
    }
}
