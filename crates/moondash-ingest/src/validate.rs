//! Structural checks on loaded reports.
//!
//! None of these are fatal. The engine tolerates every mismatch reported
//! here; the issues are surfaced so that a broken collector run is visible
//! in the logs rather than silently producing odd diagnoses.

use std::fmt;

use moondash_types::{DashboardAggregate, Platform, ReportSnapshot, Toolchain};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotIssue {
    /// `sources[position].index` disagrees with its position.
    SourceIndexMismatch { position: usize, index: usize },
    /// A release-data entry's `source` disagrees with its position.
    EntrySourceMismatch {
        toolchain: Toolchain,
        position: usize,
        source: usize,
    },
    /// Release data has more positions than there are sources.
    ExtraEntries {
        toolchain: Toolchain,
        entries: usize,
        sources: usize,
    },
    /// An entry's `cbts` length differs from its source's version count.
    CbtsLengthMismatch {
        toolchain: Toolchain,
        package: usize,
        expected: usize,
        actual: usize,
    },
    /// Two platforms disagree on the source list, so index correlation is
    /// unreliable.
    SourceListMismatch {
        platform: Platform,
        reference: Platform,
        position: Option<usize>,
    },
}

impl fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceIndexMismatch { position, index } => {
                write!(f, "source at position {position} claims index {index}")
            }
            Self::EntrySourceMismatch {
                toolchain,
                position,
                source,
            } => write!(
                f,
                "{toolchain} entry at position {position} refers to source {source}"
            ),
            Self::ExtraEntries {
                toolchain,
                entries,
                sources,
            } => write!(f, "{toolchain} has {entries} entries for {sources} sources"),
            Self::CbtsLengthMismatch {
                toolchain,
                package,
                expected,
                actual,
            } => write!(
                f,
                "{toolchain} entry {package} has {actual} cbts for {expected} versions"
            ),
            Self::SourceListMismatch {
                platform,
                reference,
                position: Some(position),
            } => write!(
                f,
                "{platform} source {position} differs from {reference}"
            ),
            Self::SourceListMismatch {
                platform,
                reference,
                position: None,
            } => write!(
                f,
                "{platform} source count differs from {reference}"
            ),
        }
    }
}

/// Check one snapshot's internal alignment.
#[must_use]
pub fn validate_snapshot(snapshot: &ReportSnapshot) -> Vec<SnapshotIssue> {
    let mut issues = Vec::new();
    for (position, source) in snapshot.sources.iter().enumerate() {
        if source.index() != position {
            issues.push(SnapshotIssue::SourceIndexMismatch {
                position,
                index: source.index(),
            });
        }
    }
    for toolchain in Toolchain::ALL {
        let entries = snapshot.entries(toolchain);
        if entries.len() > snapshot.sources.len() {
            issues.push(SnapshotIssue::ExtraEntries {
                toolchain,
                entries: entries.len(),
                sources: snapshot.sources.len(),
            });
        }
        for (position, entry) in entries.iter().enumerate() {
            let Some(entry) = entry else {
                continue;
            };
            if entry.source != position {
                issues.push(SnapshotIssue::EntrySourceMismatch {
                    toolchain,
                    position,
                    source: entry.source,
                });
            }
            let expected = snapshot.expected_versions(position);
            if entry.cbts.len() != expected {
                issues.push(SnapshotIssue::CbtsLengthMismatch {
                    toolchain,
                    package: position,
                    expected,
                    actual: entry.cbts.len(),
                });
            }
        }
    }
    issues
}

/// Compare source lists across platforms against the first present one.
#[must_use]
pub fn check_alignment(aggregate: &DashboardAggregate) -> Vec<SnapshotIssue> {
    let mut present = aggregate
        .present_platforms()
        .filter_map(|p| aggregate.snapshot(p).map(|s| (p, s)));
    let Some((reference, base)) = present.next() else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    for (platform, snapshot) in present {
        if snapshot.sources.len() != base.sources.len() {
            issues.push(SnapshotIssue::SourceListMismatch {
                platform,
                reference,
                position: None,
            });
        }
        let first_diff = snapshot
            .sources
            .iter()
            .zip(&base.sources)
            .position(|(a, b)| a.label() != b.label() || a.versions() != b.versions());
        if let Some(position) = first_diff {
            issues.push(SnapshotIssue::SourceListMismatch {
                platform,
                reference,
                position: Some(position),
            });
        }
    }
    issues
}
