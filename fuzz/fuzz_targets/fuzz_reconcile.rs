#![no_main]

//! Structured dashboards → the parallel batch must agree with per-package
//! diagnosis, and diagnosis must be deterministic.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use moondash_core::{ParallelismConfig, Reconciler, diagnose, diagnose_all_with};
use moondash_types::{
    Backend, BuildEntry, Cbt, DashboardAggregate, ExecuteResult, Phase, Platform, ReportSnapshot,
    Source, Status, ToolchainLabel, ToolchainVersion,
};

#[derive(Debug, Arbitrary)]
enum FuzzStatus {
    Absent,
    Success,
    Failure,
    Skipped,
}

impl FuzzStatus {
    fn to_result(&self) -> Option<ExecuteResult> {
        let status = match self {
            Self::Absent => return None,
            Self::Success => Status::Success,
            Self::Failure => Status::Failure,
            Self::Skipped => Status::Skipped,
        };
        Some(ExecuteResult::with_status(status))
    }
}

/// One optional CBT: nine results in phase-major order.
type FuzzCbt = Option<[FuzzStatus; 9]>;

#[derive(Debug, Arbitrary)]
struct FuzzEntry {
    present: bool,
    cbts: Vec<FuzzCbt>,
}

#[derive(Debug, Arbitrary)]
struct FuzzPlatform {
    present: bool,
    versions: u8,
    stable: Vec<FuzzEntry>,
    bleeding: Vec<FuzzEntry>,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    packages: u8,
    platforms: [FuzzPlatform; 3],
    workers: u8,
}

fn to_cbt(statuses: &[FuzzStatus; 9]) -> Cbt {
    let mut cbt = Cbt::default();
    let cells = Phase::ALL
        .into_iter()
        .flat_map(|phase| Backend::ALL.into_iter().map(move |backend| (phase, backend)));
    for ((phase, backend), status) in cells.zip(statuses) {
        *cbt.phase_mut(phase).result_mut(backend) = status.to_result();
    }
    cbt
}

fn to_entries(entries: &[FuzzEntry]) -> Vec<Option<BuildEntry>> {
    entries
        .iter()
        .take(32)
        .enumerate()
        .map(|(source, e)| {
            e.present.then(|| BuildEntry {
                source,
                cbts: e.cbts.iter().take(8).map(|c| c.as_ref().map(to_cbt)).collect(),
            })
        })
        .collect()
}

fn to_snapshot(packages: usize, p: &FuzzPlatform) -> ReportSnapshot {
    let versions: Vec<String> = (0..p.versions % 5).map(|v| format!("0.{v}.0")).collect();
    let version = |label| ToolchainVersion {
        label,
        moon_version: String::new(),
        moonc_version: String::new(),
    };
    ReportSnapshot {
        run_id: String::new(),
        run_number: String::new(),
        start_time: String::new(),
        sources: (0..packages)
            .map(|index| Source::Registry {
                name: format!("fuzz/pkg{index}"),
                versions: versions.clone(),
                running_os: Vec::new(),
                running_backend: Vec::new(),
                index,
            })
            .collect(),
        stable_toolchain_version: version(ToolchainLabel::Stable),
        stable_release_data: to_entries(&p.stable),
        bleeding_toolchain_version: version(ToolchainLabel::Bleeding),
        bleeding_release_data: to_entries(&p.bleeding),
    }
}

fuzz_target!(|input: FuzzInput| {
    let packages = usize::from(input.packages % 32);
    let aggregate = DashboardAggregate::from_snapshots(
        Platform::ALL
            .into_iter()
            .zip(&input.platforms)
            .filter(|(_, p)| p.present)
            .map(|(platform, p)| (platform, to_snapshot(packages, p))),
    );

    let workers = usize::from(input.workers % 8) + 1;
    let Some(config) = ParallelismConfig::new(workers, 1) else {
        return;
    };
    let batch = diagnose_all_with(&Reconciler::default(), &aggregate, config);
    assert_eq!(batch.len(), aggregate.package_count());
    for (i, d) in batch.iter().enumerate() {
        assert_eq!(d, &diagnose(i, &aggregate), "package {i}");
    }
});
