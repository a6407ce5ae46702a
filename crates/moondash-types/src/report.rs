//! One platform's build snapshot, in the collector's wire shape.
//!
//! The collector serializes these types with `serde_json`; field names here
//! match the document keys exactly. Optional positions (`null` or missing)
//! deserialize to `None` and mean "not attempted".

use serde::{Deserialize, Serialize};

use crate::axis::{Backend, Phase, Toolchain};

const MOONCAKES_DOCS_URL: &str = "https://mooncakes.io/docs/#";

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// A package tracked by the dashboard.
///
/// The document tags the variant by key: `{"MooncakesIO": {..}}` or
/// `{"Git": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// A package published on the mooncakes registry.
    #[serde(rename = "MooncakesIO")]
    Registry {
        name: String,
        #[serde(rename = "version")]
        versions: Vec<String>,
        #[serde(default)]
        running_os: Vec<String>,
        #[serde(default)]
        running_backend: Vec<String>,
        #[serde(default)]
        index: usize,
    },
    /// A git repository, built at one or more revisions.
    Git {
        url: String,
        #[serde(rename = "rev")]
        revisions: Vec<String>,
        #[serde(default)]
        running_os: Vec<String>,
        #[serde(default)]
        running_backend: Vec<String>,
        #[serde(default)]
        index: usize,
    },
}

impl Source {
    /// Position of this source in the snapshot's source list.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Registry { index, .. } | Self::Git { index, .. } => *index,
        }
    }

    /// Tracked versions (registry) or revisions (git), in version-index order.
    #[must_use]
    pub fn versions(&self) -> &[String] {
        match self {
            Self::Registry { versions, .. } => versions,
            Self::Git { revisions, .. } => revisions,
        }
    }

    /// Short display label: the package name or the repository URL.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Registry { name, .. } => name,
            Self::Git { url, .. } => url,
        }
    }

    /// Link to the package's home.
    #[must_use]
    pub fn url(&self) -> String {
        match self {
            Self::Registry { name, .. } => format!("{MOONCAKES_DOCS_URL}/{name}/"),
            Self::Git { url, .. } => url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Toolchains
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolchainLabel {
    Stable,
    Bleeding,
}

impl From<ToolchainLabel> for Toolchain {
    fn from(label: ToolchainLabel) -> Self {
        match label {
            ToolchainLabel::Stable => Self::Stable,
            ToolchainLabel::Bleeding => Self::Bleeding,
        }
    }
}

/// Tool versions the snapshot was built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainVersion {
    pub label: ToolchainLabel,
    /// Build tool version (`moon version`).
    pub moon_version: String,
    /// Compiler version (`moonc -v`).
    pub moonc_version: String,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    Failure,
    /// The package is not configured to run this platform/backend pair.
    Skipped,
}

/// Outcome of one concrete `moon` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteResult {
    pub status: Status,
    #[serde(default)]
    pub start_time: String,
    /// Wall time in milliseconds; only meaningful for [`Status::Success`].
    #[serde(default)]
    pub elapsed: u64,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

impl ExecuteResult {
    /// A result with empty timing and output, as produced by test fixtures
    /// and by collectors for skipped pairs.
    #[must_use]
    pub fn with_status(status: Status) -> Self {
        Self {
            status,
            start_time: String::new(),
            elapsed: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, Status::Success)
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.status, Status::Failure)
    }

    /// Elapsed time, exposed only when the command succeeded.
    #[must_use]
    pub const fn elapsed_ms(&self) -> Option<u64> {
        if self.is_success() {
            Some(self.elapsed)
        } else {
            None
        }
    }
}

/// One phase fanned out across the three backends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendState {
    #[serde(default)]
    pub wasm: Option<ExecuteResult>,
    #[serde(default)]
    pub wasm_gc: Option<ExecuteResult>,
    #[serde(default)]
    pub js: Option<ExecuteResult>,
}

impl BackendState {
    #[must_use]
    pub const fn result(&self, backend: Backend) -> Option<&ExecuteResult> {
        match backend {
            Backend::Wasm => self.wasm.as_ref(),
            Backend::WasmGc => self.wasm_gc.as_ref(),
            Backend::Js => self.js.as_ref(),
        }
    }

    pub const fn result_mut(&mut self, backend: Backend) -> &mut Option<ExecuteResult> {
        match backend {
            Backend::Wasm => &mut self.wasm,
            Backend::WasmGc => &mut self.wasm_gc,
            Backend::Js => &mut self.js,
        }
    }
}

/// Check/build/test results for one version of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cbt {
    #[serde(default)]
    pub check: BackendState,
    #[serde(default)]
    pub build: BackendState,
    #[serde(default)]
    pub test: BackendState,
}

impl Cbt {
    #[must_use]
    pub const fn phase(&self, phase: Phase) -> &BackendState {
        match phase {
            Phase::Check => &self.check,
            Phase::Build => &self.build,
            Phase::Test => &self.test,
        }
    }

    pub const fn phase_mut(&mut self, phase: Phase) -> &mut BackendState {
        match phase {
            Phase::Check => &mut self.check,
            Phase::Build => &mut self.build,
            Phase::Test => &mut self.test,
        }
    }

    #[must_use]
    pub const fn result(&self, phase: Phase, backend: Backend) -> Option<&ExecuteResult> {
        self.phase(phase).result(backend)
    }
}

/// One package's per-version results for one toolchain on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEntry {
    /// Index into the snapshot's `sources`.
    pub source: usize,
    /// One optional CBT per tracked version, aligned with the source's
    /// version list. Short vectors leave trailing versions unattempted.
    #[serde(default)]
    pub cbts: Vec<Option<Cbt>>,
}

impl BuildEntry {
    #[must_use]
    pub fn cbt(&self, version: usize) -> Option<&Cbt> {
        self.cbts.get(version).and_then(Option::as_ref)
    }

    /// Every recorded result for `phase`/`backend`, across all versions.
    pub fn results(&self, phase: Phase, backend: Backend) -> impl Iterator<Item = &ExecuteResult> {
        self.cbts
            .iter()
            .flatten()
            .filter_map(move |cbt| cbt.result(phase, backend))
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A complete collector run on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub run_id: String,
    pub run_number: String,
    pub start_time: String,

    pub sources: Vec<Source>,

    pub stable_toolchain_version: ToolchainVersion,
    #[serde(default)]
    pub stable_release_data: Vec<Option<BuildEntry>>,

    pub bleeding_toolchain_version: ToolchainVersion,
    #[serde(default)]
    pub bleeding_release_data: Vec<Option<BuildEntry>>,
}

impl ReportSnapshot {
    #[must_use]
    pub const fn toolchain_version(&self, toolchain: Toolchain) -> &ToolchainVersion {
        match toolchain {
            Toolchain::Stable => &self.stable_toolchain_version,
            Toolchain::Bleeding => &self.bleeding_toolchain_version,
        }
    }

    #[must_use]
    pub fn entries(&self, toolchain: Toolchain) -> &[Option<BuildEntry>] {
        match toolchain {
            Toolchain::Stable => &self.stable_release_data,
            Toolchain::Bleeding => &self.bleeding_release_data,
        }
    }

    /// Entry at package position `package`, or `None` when out of range or
    /// recorded as missing.
    #[must_use]
    pub fn entry(&self, toolchain: Toolchain, package: usize) -> Option<&BuildEntry> {
        self.entries(toolchain).get(package).and_then(Option::as_ref)
    }

    /// Number of versions the source at `package` tracks (0 if out of range).
    #[must_use]
    pub fn expected_versions(&self, package: usize) -> usize {
        self.sources.get(package).map_or(0, |s| s.versions().len())
    }
}
