//! Write dashboards in the collector's on-disk layout.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use moondash_types::{DashboardAggregate, ReportSnapshot};

/// Encode a snapshot as one gzip-compressed JSON line.
pub fn to_jsonl_gz(snapshot: &ReportSnapshot) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    serde_json::to_writer(&mut encoder, snapshot)?;
    encoder.write_all(b"\n")?;
    encoder.finish()
}

/// Write `<root>/<platform>/latest_data.jsonl.gz` for every present platform.
pub fn write_reports(root: &Path, aggregate: &DashboardAggregate) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for platform in aggregate.present_platforms() {
        let Some(snapshot) = aggregate.snapshot(platform) else {
            continue;
        };
        let dir = root.join(platform.as_str());
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("latest_data.jsonl.gz");
        std::fs::write(&path, to_jsonl_gz(snapshot)?)?;
        written.push(path);
    }
    Ok(written)
}
