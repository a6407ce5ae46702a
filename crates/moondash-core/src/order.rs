//! Iteration order of the engine's dimensions.

use moondash_types::{Backend, Phase, Platform};

/// The orders in which the engine walks platforms, phases, and backends.
///
/// Ties between simultaneously present patterns are broken by these lists,
/// so they are data rather than ambient constants. Toolchains are always
/// walked stable-first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineOrder {
    pub platforms: Vec<Platform>,
    pub phases: Vec<Phase>,
    pub backends: Vec<Backend>,
}

impl EngineOrder {
    /// mac, windows, linux / check, build, test / wasm, wasm_gc, js.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            phases: Phase::ALL.to_vec(),
            backends: Backend::ALL.to_vec(),
        }
    }
}

impl Default for EngineOrder {
    fn default() -> Self {
        Self::canonical()
    }
}
