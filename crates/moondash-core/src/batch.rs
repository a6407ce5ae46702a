//! Whole-dashboard evaluation with bounded parallelism.
//!
//! Package diagnoses are independent, so the index range is cut into
//! contiguous chunks and each chunk runs on a scoped worker thread. Results
//! are reassembled by package index, never by completion order.

use std::num::NonZeroUsize;

use moondash_types::DashboardAggregate;
use tracing::debug;

use crate::reconcile::{Diagnosis, Reconciler};

const MAX_BALANCED_WORKERS: usize = 16;

/// Packages below which a second worker is not worth spawning.
const DEFAULT_MIN_CHUNK: usize = 64;

/// Runtime profile for worker-count defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelismProfile {
    /// One worker per available CPU, capped.
    Balanced,
    /// Everything on the calling thread.
    Sequential,
}

/// Bounded parallelism configuration for batch diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismConfig {
    /// Upper bound on worker threads.
    pub max_workers: usize,
    /// Minimum packages per worker.
    pub min_chunk: usize,
}

impl ParallelismConfig {
    /// Create an explicit configuration.
    ///
    /// Returns `None` when `max_workers` is zero.
    #[must_use]
    pub const fn new(max_workers: usize, min_chunk: usize) -> Option<Self> {
        if max_workers == 0 {
            None
        } else {
            Some(Self {
                max_workers,
                min_chunk: if min_chunk == 0 { 1 } else { min_chunk },
            })
        }
    }

    #[must_use]
    pub fn for_profile(profile: ParallelismProfile) -> Self {
        match profile {
            ParallelismProfile::Balanced => Self {
                max_workers: balanced_worker_max(available_parallelism_or_one()),
                min_chunk: DEFAULT_MIN_CHUNK,
            },
            ParallelismProfile::Sequential => Self {
                max_workers: 1,
                min_chunk: DEFAULT_MIN_CHUNK,
            },
        }
    }

    /// Workers actually used for `items` packages (at least 1).
    #[must_use]
    pub const fn workers_for(self, items: usize) -> usize {
        let by_chunk = items.div_ceil(self.min_chunk);
        let workers = if by_chunk < self.max_workers {
            by_chunk
        } else {
            self.max_workers
        };
        if workers == 0 { 1 } else { workers }
    }
}

impl Default for ParallelismConfig {
    fn default() -> Self {
        Self::for_profile(ParallelismProfile::Balanced)
    }
}

/// `clamp(P, 1, 16)` where `P = available_parallelism`.
#[must_use]
pub const fn balanced_worker_max(p: usize) -> usize {
    if p == 0 {
        1
    } else if p > MAX_BALANCED_WORKERS {
        MAX_BALANCED_WORKERS
    } else {
        p
    }
}

/// Return `std::thread::available_parallelism()` with a safe floor of 1.
#[must_use]
pub fn available_parallelism_or_one() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Diagnose every package with the canonical order and balanced parallelism.
#[must_use]
pub fn diagnose_all(data: &DashboardAggregate) -> Vec<Diagnosis> {
    diagnose_all_with(&Reconciler::default(), data, ParallelismConfig::default())
}

/// Diagnose every package; element `i` is the diagnosis of package `i`.
#[must_use]
pub fn diagnose_all_with(
    reconciler: &Reconciler,
    data: &DashboardAggregate,
    config: ParallelismConfig,
) -> Vec<Diagnosis> {
    let count = data.package_count();
    let workers = config.workers_for(count);
    debug!(packages = count, workers, "diagnosing dashboard");

    if workers <= 1 {
        return (0..count).map(|i| reconciler.diagnose(i, data)).collect();
    }

    let chunk = count.div_ceil(workers);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..count)
            .step_by(chunk)
            .map(|start| {
                let end = (start + chunk).min(count);
                scope.spawn(move || {
                    (start..end)
                        .map(|i| reconciler.diagnose(i, data))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut out = Vec::with_capacity(count);
        for handle in handles {
            match handle.join() {
                Ok(part) => out.extend(part),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        out
    })
}
