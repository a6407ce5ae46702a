//! End-to-end laws of the reconciliation engine, driven through
//! declarative scenarios.

use moondash_core::predicate::outcome;
use moondash_core::{
    DiagnosisKind, Outcome, ParallelismConfig, Reconciler, Severity, diagnose, diagnose_all,
    diagnose_all_with, succeeded,
};
use moondash_harness::logging::init_test_logging;
use moondash_harness::{Cell, Scenario};
use moondash_types::{Backend, Phase, Platform, Status, Toolchain};

const STABLE: Toolchain = Toolchain::Stable;
const BLEEDING: Toolchain = Toolchain::Bleeding;

#[test]
fn uniform_success_is_all_passed() {
    init_test_logging();
    let data = Scenario::uniform(4, 3).build();
    for i in 0..4 {
        let d = diagnose(i, &data);
        assert_eq!(d.text, "All passed");
        assert_eq!(d.severity, Severity::Success);
        assert_eq!(d.kind, DiagnosisKind::AllPassed);
    }
}

#[test]
fn bleeding_build_failure_on_mac_is_a_regression() {
    init_test_logging();
    let data = Scenario::uniform(1, 1)
        .fail(Cell::new(Platform::Mac, BLEEDING, Phase::Build, Backend::Wasm))
        .build();
    let d = diagnose(0, &data);
    assert_eq!(d.severity, Severity::Error);
    assert!(d.text.contains("wasm"));
    assert!(d.text.contains("build"));
    assert!(d.text.contains("passed in stable but failed in bleeding"));
    assert_eq!(
        d.text,
        "Regression detected: wasm build passed in stable but failed in bleeding"
    );
}

#[test]
fn linux_only_check_failure_names_platforms_in_order() {
    let data = Scenario::uniform(1, 1)
        .fail(Cell::new(Platform::Linux, STABLE, Phase::Check, Backend::Js))
        .fail(Cell::new(Platform::Linux, BLEEDING, Phase::Check, Backend::Js))
        .build();
    let d = diagnose(0, &data);
    assert_eq!(d.kind, DiagnosisKind::PlatformInconsistency);
    assert_eq!(
        d.text,
        "Platform inconsistency: js check passed on mac, windows but failed on linux"
    );
}

#[test]
fn any_passing_version_counts_as_success() {
    let data = Scenario::new()
        .registry("moonbitlang/x", &["0.4.1", "0.4.2"])
        .fail(
            Cell::new(Platform::Linux, STABLE, Phase::Test, Backend::WasmGc)
                .version(0),
        )
        .build();
    let entry = data
        .snapshot(Platform::Linux)
        .and_then(|s| s.entry(STABLE, 0))
        .unwrap();
    assert!(succeeded(entry, Phase::Test, Backend::WasmGc));
    assert_eq!(outcome(Some(entry), Phase::Test, Backend::WasmGc), Outcome::Passed);

    // The version-level failure is invisible to rules 2-5 and keeps the
    // package out of "All passed".
    assert_eq!(diagnose(0, &data).kind, DiagnosisKind::OtherFailure);
}

#[test]
fn absent_bleeding_entry_matches_null_results() {
    let absent = Scenario::uniform(1, 2)
        .missing_entry(Platform::Mac, BLEEDING, 0)
        .missing_entry(Platform::Windows, BLEEDING, 0)
        .missing_entry(Platform::Linux, BLEEDING, 0)
        .build();

    let mut nulls = Scenario::uniform(1, 2);
    for platform in Platform::ALL {
        for version in 0..2 {
            for phase in Phase::ALL {
                for backend in Backend::ALL {
                    nulls = nulls.set(
                        Cell::new(platform, BLEEDING, phase, backend).version(version),
                        None,
                    );
                }
            }
        }
    }
    let nulls = nulls.build();

    for platform in Platform::ALL {
        for phase in Phase::ALL {
            for backend in Backend::ALL {
                let a = outcome(
                    absent.snapshot(platform).and_then(|s| s.entry(BLEEDING, 0)),
                    phase,
                    backend,
                );
                let n = outcome(
                    nulls.snapshot(platform).and_then(|s| s.entry(BLEEDING, 0)),
                    phase,
                    backend,
                );
                assert_eq!(a, Outcome::NotAttempted);
                assert_eq!(a, n);
            }
        }
    }

    let da = diagnose(0, &absent);
    let dn = diagnose(0, &nulls);
    assert_ne!(da.kind, DiagnosisKind::ToolchainRegression);
    assert_eq!(da, dn);
    // Stable results were recorded, so this is not a total absence.
    assert_eq!(da.kind, DiagnosisKind::OtherFailure);
}

#[test]
fn one_missing_bleeding_result_is_other_failure() {
    let data = Scenario::uniform(1, 1)
        .set(Cell::new(Platform::Mac, BLEEDING, Phase::Check, Backend::Wasm), None)
        .build();
    let d = diagnose(0, &data);
    assert_eq!(d.text, "Other failure");
    assert_eq!(d.severity, Severity::Error);
}

#[test]
fn no_data_only_when_nothing_was_recorded() {
    let mut absent = Scenario::uniform(2, 1);
    for platform in Platform::ALL {
        for toolchain in Toolchain::ALL {
            absent = absent.missing_entry(platform, toolchain, 0);
        }
    }
    let all = diagnose_all(&absent.build());
    assert_eq!(all[0].kind, DiagnosisKind::NoData);
    assert_eq!(all[1].kind, DiagnosisKind::AllPassed);

    let skipped = Scenario::uniform(1, 1).fill(Some(Status::Skipped)).build();
    assert_eq!(diagnose(0, &skipped).kind, DiagnosisKind::OtherFailure);
}

#[test]
fn platform_inconsistency_outranks_backend_inconsistency() {
    // mac check/wasm fails while the other mac backends pass (a backend
    // split) and windows/linux pass (a platform split).
    let data = Scenario::uniform(1, 1)
        .fail(Cell::new(Platform::Mac, STABLE, Phase::Check, Backend::Wasm))
        .build();
    let d = diagnose(0, &data);
    assert_eq!(d.kind, DiagnosisKind::PlatformInconsistency);
    assert_eq!(
        d.text,
        "Platform inconsistency: wasm check passed on windows, linux but failed on mac"
    );
}

#[test]
fn backend_split_when_every_platform_agrees() {
    let data = Scenario::uniform(1, 1)
        .fail_everywhere(STABLE, 0, Phase::Build, Backend::WasmGc)
        .build();
    assert_eq!(
        diagnose(0, &data).text,
        "Backend inconsistency: build passed on wasm, js but failed on wasm_gc"
    );
}

#[test]
fn phase_split_when_every_backend_agrees() {
    let mut scenario = Scenario::uniform(1, 1);
    for backend in Backend::ALL {
        scenario = scenario.fail_everywhere(STABLE, 0, Phase::Test, backend);
    }
    let d = diagnose(0, &scenario.build());
    assert_eq!(d.kind, DiagnosisKind::PhaseInconsistency);
    assert_eq!(d.text, "Phase inconsistency: passed check, build but failed test");
}

#[test]
fn everything_failing_is_other_failure() {
    let data = Scenario::uniform(1, 1).fill(Some(Status::Failure)).build();
    let d = diagnose(0, &data);
    assert_eq!(d.text, "Other failure");
    assert_eq!(d.severity, Severity::Error);
}

#[test]
fn empty_aggregate_and_out_of_range_package_have_no_data() {
    let empty = Scenario::uniform(2, 1).platforms(&[]).build();
    assert!(empty.is_empty());
    assert!(diagnose_all(&empty).is_empty());
    assert_eq!(diagnose(0, &empty).kind, DiagnosisKind::NoData);

    let data = Scenario::uniform(2, 1).build();
    assert_eq!(diagnose(9, &data).text, "No data available");
}

#[test]
fn missing_platform_does_not_block_all_passed() {
    let data = Scenario::uniform(2, 1)
        .platforms(&[Platform::Windows, Platform::Linux])
        .build();
    assert!(diagnose_all(&data).iter().all(|d| d.kind == DiagnosisKind::AllPassed));
}

#[test]
fn git_sources_reconcile_like_registry_sources() {
    let data = Scenario::new()
        .git("https://github.com/moonbitlang/core", &["main", "next"])
        .registry("moonbitlang/x", &["0.4.1"])
        .fail(Cell::new(Platform::Windows, BLEEDING, Phase::Test, Backend::Js))
        .fail(Cell::new(Platform::Windows, BLEEDING, Phase::Test, Backend::Js).version(1))
        .build();
    let all = diagnose_all(&data);
    assert_eq!(all[0].kind, DiagnosisKind::ToolchainRegression);
    assert_eq!(all[1].kind, DiagnosisKind::AllPassed);
}

#[test]
fn diagnose_is_idempotent() {
    let data = Scenario::uniform(3, 2)
        .fail(Cell::new(Platform::Windows, STABLE, Phase::Build, Backend::Js).package(1))
        .null_cbt(Platform::Linux, BLEEDING, 2, 1)
        .build();
    for i in 0..3 {
        assert_eq!(diagnose(i, &data), diagnose(i, &data));
    }
}

#[test]
fn batch_matches_single_package_for_every_worker_count() {
    init_test_logging();
    let mut scenario = Scenario::uniform(40, 2);
    for i in (0..40).step_by(3) {
        scenario = scenario.fail(Cell::new(Platform::Mac, BLEEDING, Phase::Check, Backend::Wasm).package(i));
    }
    for i in (1..40).step_by(7) {
        scenario = scenario.missing_entry(Platform::Linux, STABLE, i);
    }
    let data = scenario.build();
    let expected: Vec<_> = (0..40).map(|i| diagnose(i, &data)).collect();
    let reconciler = Reconciler::default();
    for workers in [1, 2, 3, 8, 64] {
        let config = ParallelismConfig::new(workers, 1).unwrap();
        assert_eq!(diagnose_all_with(&reconciler, &data, config), expected, "workers={workers}");
    }
    assert_eq!(diagnose_all(&data), expected);
}
