//! Bounds-safe access to one package's results across the aggregate.

use moondash_types::{Backend, BuildEntry, DashboardAggregate, Phase, Platform, Source, Toolchain};

use crate::predicate::{self, Outcome};

/// A view of package `package` across every platform and toolchain.
///
/// Lookups never panic: a missing snapshot, an out-of-range position, or a
/// `null` entry all come back as `None` / [`Outcome::NotAttempted`].
#[derive(Debug, Clone, Copy)]
pub struct ResultIndex<'a> {
    data: &'a DashboardAggregate,
    package: usize,
}

impl<'a> ResultIndex<'a> {
    #[must_use]
    pub const fn new(data: &'a DashboardAggregate, package: usize) -> Self {
        Self { data, package }
    }

    #[must_use]
    pub const fn package(&self) -> usize {
        self.package
    }

    #[must_use]
    pub fn source(&self) -> Option<&'a Source> {
        self.data.source(self.package)
    }

    #[must_use]
    pub fn has_platform(&self, platform: Platform) -> bool {
        self.data.snapshot(platform).is_some()
    }

    #[must_use]
    pub fn entry(&self, platform: Platform, toolchain: Toolchain) -> Option<&'a BuildEntry> {
        self.data
            .snapshot(platform)
            .and_then(|snap| snap.entry(toolchain, self.package))
    }

    /// Number of versions the package tracks on `platform`.
    #[must_use]
    pub fn expected_versions(&self, platform: Platform) -> usize {
        self.data
            .snapshot(platform)
            .map_or(0, |snap| snap.expected_versions(self.package))
    }

    #[must_use]
    pub fn outcome(
        &self,
        platform: Platform,
        toolchain: Toolchain,
        phase: Phase,
        backend: Backend,
    ) -> Outcome {
        predicate::outcome(self.entry(platform, toolchain), phase, backend)
    }

    /// The existential status predicate at one coordinate; `false` when absent.
    #[must_use]
    pub fn succeeded(
        &self,
        platform: Platform,
        toolchain: Toolchain,
        phase: Phase,
        backend: Backend,
    ) -> bool {
        self.entry(platform, toolchain)
            .is_some_and(|entry| predicate::succeeded(entry, phase, backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moondash_types::{
        Cbt, ExecuteResult, ReportSnapshot, Status, ToolchainLabel, ToolchainVersion,
    };

    fn snapshot(stable: Vec<Option<BuildEntry>>) -> ReportSnapshot {
        let version = |label| ToolchainVersion {
            label,
            moon_version: String::new(),
            moonc_version: String::new(),
        };
        ReportSnapshot {
            run_id: "r".to_owned(),
            run_number: "1".to_owned(),
            start_time: String::new(),
            sources: vec![
                Source::Git {
                    url: "https://example.com/a".to_owned(),
                    revisions: vec!["main".to_owned(), "dev".to_owned()],
                    running_os: Vec::new(),
                    running_backend: Vec::new(),
                    index: 0,
                },
                Source::Git {
                    url: "https://example.com/b".to_owned(),
                    revisions: vec!["main".to_owned()],
                    running_os: Vec::new(),
                    running_backend: Vec::new(),
                    index: 1,
                },
            ],
            stable_toolchain_version: version(ToolchainLabel::Stable),
            stable_release_data: stable,
            bleeding_toolchain_version: version(ToolchainLabel::Bleeding),
            bleeding_release_data: Vec::new(),
        }
    }

    #[test]
    fn lookups_are_bounds_safe() {
        let mut cbt = Cbt::default();
        *cbt.phase_mut(Phase::Build).result_mut(Backend::Wasm) =
            Some(ExecuteResult::with_status(Status::Success));
        let agg = DashboardAggregate::new().with_snapshot(
            Platform::Linux,
            snapshot(vec![Some(BuildEntry {
                source: 0,
                cbts: vec![Some(cbt)],
            })]),
        );

        let first = ResultIndex::new(&agg, 0);
        assert!(first.has_platform(Platform::Linux));
        assert!(!first.has_platform(Platform::Mac));
        assert_eq!(first.expected_versions(Platform::Linux), 2);
        assert_eq!(first.expected_versions(Platform::Mac), 0);
        assert!(first.succeeded(Platform::Linux, Toolchain::Stable, Phase::Build, Backend::Wasm));
        assert!(!first.succeeded(Platform::Mac, Toolchain::Stable, Phase::Build, Backend::Wasm));
        assert!(first.entry(Platform::Linux, Toolchain::Bleeding).is_none());

        // Package 1 exists in sources but has no release-data position.
        let second = ResultIndex::new(&agg, 1);
        assert!(second.entry(Platform::Linux, Toolchain::Stable).is_none());
        assert_eq!(
            second.outcome(Platform::Linux, Toolchain::Stable, Phase::Check, Backend::Js),
            Outcome::NotAttempted
        );

        let far = ResultIndex::new(&agg, 99);
        assert!(far.source().is_none());
        assert!(far.entry(Platform::Linux, Toolchain::Stable).is_none());
    }
}
