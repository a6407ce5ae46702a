//! The three-platform container consumed by the reconciliation engine.

use serde::{Deserialize, Serialize};

use crate::axis::Platform;
use crate::report::{ReportSnapshot, Source};

/// One refresh cycle's worth of snapshots, keyed by platform.
///
/// Any platform may be absent: each snapshot is fetched independently and
/// a failed fetch leaves a hole rather than failing the whole dashboard.
/// Package positions are assumed to line up across platforms; the ingest
/// layer warns when they do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardAggregate {
    #[serde(default)]
    mac: Option<ReportSnapshot>,
    #[serde(default)]
    windows: Option<ReportSnapshot>,
    #[serde(default)]
    linux: Option<ReportSnapshot>,
}

impl DashboardAggregate {
    /// An aggregate with no platform data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter; the aggregate is not mutated after construction.
    #[must_use]
    pub fn with_snapshot(mut self, platform: Platform, snapshot: ReportSnapshot) -> Self {
        *self.slot_mut(platform) = Some(snapshot);
        self
    }

    /// Collect `(platform, snapshot)` pairs; a later pair for the same
    /// platform replaces an earlier one.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = (Platform, ReportSnapshot)>) -> Self {
        snapshots
            .into_iter()
            .fold(Self::new(), |agg, (platform, snap)| agg.with_snapshot(platform, snap))
    }

    #[must_use]
    pub const fn snapshot(&self, platform: Platform) -> Option<&ReportSnapshot> {
        match platform {
            Platform::Mac => self.mac.as_ref(),
            Platform::Windows => self.windows.as_ref(),
            Platform::Linux => self.linux.as_ref(),
        }
    }

    const fn slot_mut(&mut self, platform: Platform) -> &mut Option<ReportSnapshot> {
        match platform {
            Platform::Mac => &mut self.mac,
            Platform::Windows => &mut self.windows,
            Platform::Linux => &mut self.linux,
        }
    }

    /// Platforms that carry a snapshot, in canonical order.
    pub fn present_platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        Platform::ALL
            .into_iter()
            .filter(|p| self.snapshot(*p).is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present_platforms().next().is_none()
    }

    /// Number of packages: the longest source list among present snapshots.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.present_platforms()
            .filter_map(|p| self.snapshot(p))
            .map(|s| s.sources.len())
            .max()
            .unwrap_or(0)
    }

    /// Source at `package`, taken from the first platform that has it.
    #[must_use]
    pub fn source(&self, package: usize) -> Option<&Source> {
        self.present_platforms()
            .filter_map(|p| self.snapshot(p))
            .find_map(|s| s.sources.get(package))
    }
}
