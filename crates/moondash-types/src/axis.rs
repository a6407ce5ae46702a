//! The four dimensions of the result matrix.
//!
//! Every enum here exposes an `ALL` constant in canonical order. The
//! reconciliation engine breaks ties by walking these orders, so the order
//! of each `ALL` array is part of the observable output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating platform a snapshot was collected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "mac", alias = "macos")]
    Mac,
    #[serde(rename = "windows")]
    Windows,
    #[serde(rename = "linux")]
    Linux,
}

impl Platform {
    /// All platforms, in tie-breaking order.
    pub const ALL: [Self; 3] = [Self::Mac, Self::Windows, Self::Linux];

    /// Stable string identifier, also the per-platform directory name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mac => "mac",
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Check,
    Build,
    Test,
}

impl Phase {
    /// All phases, in tie-breaking order.
    pub const ALL: [Self; 3] = [Self::Check, Self::Build, Self::Test];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Build => "build",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compile target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Backend {
    #[serde(rename = "wasm")]
    Wasm,
    #[serde(rename = "wasm_gc", alias = "wasm-gc")]
    WasmGc,
    #[serde(rename = "js")]
    Js,
}

impl Backend {
    /// All backends, in tie-breaking order.
    pub const ALL: [Self; 3] = [Self::Wasm, Self::WasmGc, Self::Js];

    /// Name as it appears in report field names and diagnosis text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wasm => "wasm",
            Self::WasmGc => "wasm_gc",
            Self::Js => "js",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toolchain track evaluated for every package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Toolchain {
    Stable,
    Bleeding,
}

impl Toolchain {
    /// Stable is always consulted before bleeding.
    pub const ALL: [Self; 2] = [Self::Stable, Self::Bleeding];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Bleeding => "bleeding",
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
