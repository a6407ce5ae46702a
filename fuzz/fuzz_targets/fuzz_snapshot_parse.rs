#![no_main]

//! Arbitrary bytes → parse_snapshot must not panic; anything that parses
//! must diagnose without panicking and survive a JSON round trip.

use libfuzzer_sys::fuzz_target;

use moondash_core::diagnose_all;
use moondash_ingest::parse_snapshot;
use moondash_types::{DashboardAggregate, Platform, ReportSnapshot};

fuzz_target!(|data: &[u8]| {
    if data.len() > 1 << 20 {
        return;
    }
    let Ok(snapshot) = parse_snapshot(data) else {
        return;
    };

    let aggregate = DashboardAggregate::new()
        .with_snapshot(Platform::Mac, snapshot.clone())
        .with_snapshot(Platform::Linux, snapshot.clone());
    let diagnoses = diagnose_all(&aggregate);
    assert_eq!(diagnoses.len(), aggregate.package_count());

    let text = serde_json::to_string(&snapshot).unwrap();
    let back: ReportSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(back, snapshot);
});
