//! Declarative dashboard scenarios.
//!
//! A [`Scenario`] starts from a uniform fill (every result `Success` by
//! default) across the chosen platforms and both toolchains, then applies
//! edits in the order they were added.

use moondash_types::{
    Backend, BuildEntry, Cbt, DashboardAggregate, ExecuteResult, Phase, Platform, ReportSnapshot,
    Source, Status, Toolchain, ToolchainLabel, ToolchainVersion,
};

/// Coordinate of one result inside a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub platform: Platform,
    pub toolchain: Toolchain,
    pub package: usize,
    pub version: usize,
    pub phase: Phase,
    pub backend: Backend,
}

impl Cell {
    /// Package 0, version 0.
    #[must_use]
    pub const fn new(platform: Platform, toolchain: Toolchain, phase: Phase, backend: Backend) -> Self {
        Self {
            platform,
            toolchain,
            package: 0,
            version: 0,
            phase,
            backend,
        }
    }

    #[must_use]
    pub const fn package(mut self, package: usize) -> Self {
        self.package = package;
        self
    }

    #[must_use]
    pub const fn version(mut self, version: usize) -> Self {
        self.version = version;
        self
    }
}

#[derive(Debug, Clone)]
enum Edit {
    Result(Cell, Option<Status>),
    MissingEntry {
        platform: Platform,
        toolchain: Toolchain,
        package: usize,
    },
    NullCbt {
        platform: Platform,
        toolchain: Toolchain,
        package: usize,
        version: usize,
    },
    TruncateCbts {
        platform: Platform,
        toolchain: Toolchain,
        package: usize,
        len: usize,
    },
}

/// Builder for a [`DashboardAggregate`].
#[derive(Debug, Clone)]
pub struct Scenario {
    platforms: Vec<Platform>,
    sources: Vec<Source>,
    fill: Option<Status>,
    edits: Vec<Edit>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// All three platforms, no packages, success fill.
    #[must_use]
    pub fn new() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            sources: Vec::new(),
            fill: Some(Status::Success),
            edits: Vec::new(),
        }
    }

    /// `packages` registry packages named `user/pkg<i>`, each with
    /// `versions` versions.
    #[must_use]
    pub fn uniform(packages: usize, versions: usize) -> Self {
        let versions: Vec<String> = (0..versions).map(|v| format!("0.{v}.0")).collect();
        let names: Vec<String> = (0..packages).map(|i| format!("user/pkg{i}")).collect();
        names.iter().fold(Self::new(), |scenario, name| {
            let refs: Vec<&str> = versions.iter().map(String::as_str).collect();
            scenario.registry(name, &refs)
        })
    }

    #[must_use]
    pub fn registry(mut self, name: &str, versions: &[&str]) -> Self {
        let index = self.sources.len();
        self.sources.push(Source::Registry {
            name: name.to_owned(),
            versions: versions.iter().map(|v| (*v).to_owned()).collect(),
            running_os: Vec::new(),
            running_backend: Vec::new(),
            index,
        });
        self
    }

    #[must_use]
    pub fn git(mut self, url: &str, revisions: &[&str]) -> Self {
        let index = self.sources.len();
        self.sources.push(Source::Git {
            url: url.to_owned(),
            revisions: revisions.iter().map(|r| (*r).to_owned()).collect(),
            running_os: Vec::new(),
            running_backend: Vec::new(),
            index,
        });
        self
    }

    /// Restrict the scenario to `platforms`; the others get no snapshot.
    #[must_use]
    pub fn platforms(mut self, platforms: &[Platform]) -> Self {
        self.platforms = platforms.to_vec();
        self
    }

    /// Status written into every cell before edits; `None` leaves every
    /// backend result absent.
    #[must_use]
    pub fn fill(mut self, status: Option<Status>) -> Self {
        self.fill = status;
        self
    }

    #[must_use]
    pub fn set(mut self, cell: Cell, status: Option<Status>) -> Self {
        self.edits.push(Edit::Result(cell, status));
        self
    }

    #[must_use]
    pub fn fail(self, cell: Cell) -> Self {
        self.set(cell, Some(Status::Failure))
    }

    #[must_use]
    pub fn pass(self, cell: Cell) -> Self {
        self.set(cell, Some(Status::Success))
    }

    /// Fail a (toolchain, phase, backend) triple of `package` on every
    /// scenario platform.
    #[must_use]
    pub fn fail_everywhere(
        self,
        toolchain: Toolchain,
        package: usize,
        phase: Phase,
        backend: Backend,
    ) -> Self {
        let platforms = self.platforms.clone();
        platforms.into_iter().fold(self, |s, platform| {
            s.fail(Cell::new(platform, toolchain, phase, backend).package(package))
        })
    }

    #[must_use]
    pub fn missing_entry(mut self, platform: Platform, toolchain: Toolchain, package: usize) -> Self {
        self.edits.push(Edit::MissingEntry {
            platform,
            toolchain,
            package,
        });
        self
    }

    #[must_use]
    pub fn null_cbt(
        mut self,
        platform: Platform,
        toolchain: Toolchain,
        package: usize,
        version: usize,
    ) -> Self {
        self.edits.push(Edit::NullCbt {
            platform,
            toolchain,
            package,
            version,
        });
        self
    }

    #[must_use]
    pub fn truncate_cbts(
        mut self,
        platform: Platform,
        toolchain: Toolchain,
        package: usize,
        len: usize,
    ) -> Self {
        self.edits.push(Edit::TruncateCbts {
            platform,
            toolchain,
            package,
            len,
        });
        self
    }

    #[must_use]
    pub fn package_count(&self) -> usize {
        self.sources.len()
    }

    /// The snapshot for `platform` after all edits.
    #[must_use]
    pub fn snapshot(&self, platform: Platform) -> ReportSnapshot {
        let mut snapshot = ReportSnapshot {
            run_id: "4242".to_owned(),
            run_number: "17".to_owned(),
            start_time: "2025-03-01T02:00:00+08:00".to_owned(),
            sources: self.sources.clone(),
            stable_toolchain_version: toolchain_version(ToolchainLabel::Stable),
            stable_release_data: self.filled_entries(),
            bleeding_toolchain_version: toolchain_version(ToolchainLabel::Bleeding),
            bleeding_release_data: self.filled_entries(),
        };
        for edit in &self.edits {
            apply(&mut snapshot, platform, edit);
        }
        snapshot
    }

    #[must_use]
    pub fn build(&self) -> DashboardAggregate {
        DashboardAggregate::from_snapshots(self.platforms.iter().map(|p| (*p, self.snapshot(*p))))
    }

    fn filled_entries(&self) -> Vec<Option<BuildEntry>> {
        self.sources
            .iter()
            .enumerate()
            .map(|(source, s)| {
                Some(BuildEntry {
                    source,
                    cbts: s.versions().iter().map(|_| Some(filled_cbt(self.fill))).collect(),
                })
            })
            .collect()
    }
}

fn toolchain_version(label: ToolchainLabel) -> ToolchainVersion {
    let (moon, moonc) = match label {
        ToolchainLabel::Stable => ("moon 0.1.20250226", "v0.1.20250226"),
        ToolchainLabel::Bleeding => ("moon 0.1.20250301", "v0.1.20250301+nightly"),
    };
    ToolchainVersion {
        label,
        moon_version: moon.to_owned(),
        moonc_version: moonc.to_owned(),
    }
}

fn filled_cbt(fill: Option<Status>) -> Cbt {
    let mut cbt = Cbt::default();
    for phase in Phase::ALL {
        for backend in Backend::ALL {
            *cbt.phase_mut(phase).result_mut(backend) = fill.map(ExecuteResult::with_status);
        }
    }
    cbt
}

fn entries_mut(snapshot: &mut ReportSnapshot, toolchain: Toolchain) -> &mut Vec<Option<BuildEntry>> {
    match toolchain {
        Toolchain::Stable => &mut snapshot.stable_release_data,
        Toolchain::Bleeding => &mut snapshot.bleeding_release_data,
    }
}

fn entry_mut(
    snapshot: &mut ReportSnapshot,
    toolchain: Toolchain,
    package: usize,
) -> Option<&mut BuildEntry> {
    entries_mut(snapshot, toolchain)
        .get_mut(package)
        .and_then(Option::as_mut)
}

fn apply(snapshot: &mut ReportSnapshot, platform: Platform, edit: &Edit) {
    match *edit {
        Edit::Result(cell, status) if cell.platform == platform => {
            let Some(entry) = entry_mut(snapshot, cell.toolchain, cell.package) else {
                return;
            };
            if entry.cbts.len() <= cell.version {
                entry.cbts.resize(cell.version + 1, None);
            }
            let cbt = entry.cbts[cell.version].get_or_insert_with(Cbt::default);
            *cbt.phase_mut(cell.phase).result_mut(cell.backend) =
                status.map(ExecuteResult::with_status);
        }
        Edit::MissingEntry {
            platform: p,
            toolchain,
            package,
        } if p == platform => {
            if let Some(slot) = entries_mut(snapshot, toolchain).get_mut(package) {
                *slot = None;
            }
        }
        Edit::NullCbt {
            platform: p,
            toolchain,
            package,
            version,
        } if p == platform => {
            if let Some(cbt) = entry_mut(snapshot, toolchain, package)
                .and_then(|entry| entry.cbts.get_mut(version))
            {
                *cbt = None;
            }
        }
        Edit::TruncateCbts {
            platform: p,
            toolchain,
            package,
            len,
        } if p == platform => {
            if let Some(entry) = entry_mut(snapshot, toolchain, package) {
                entry.cbts.truncate(len);
            }
        }
        _ => {}
    }
}
