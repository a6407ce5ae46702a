//! Local ingestion adapter.
//!
//! The collector writes one document per platform as
//! `<root>/<platform>/<date>_data.jsonl.gz` plus a `latest_data.jsonl.gz`
//! copy. This crate reads such files (gzip or plain, JSON-lines or a single
//! JSON value) into [`ReportSnapshot`]s and assembles a
//! [`DashboardAggregate`]. Fetching over the network is out of scope.
//!
//! Missing files are tolerated: the platform is left out of the aggregate.
//! Files that exist but cannot be read or decoded are hard errors.

pub mod validate;

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use moondash_error::{DashboardError, Result};
use moondash_types::{DashboardAggregate, Platform, ReportSnapshot};
use tracing::{info, warn};

pub use validate::{SnapshotIssue, check_alignment, validate_snapshot};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// File names tried inside each platform directory, in preference order.
pub const LATEST_FILE_NAMES: [&str; 3] =
    ["latest_data.jsonl.gz", "latest_data.jsonl", "latest_data.json"];

/// Decode one report document from raw bytes.
///
/// Gzip input is detected by its magic bytes. The first non-empty line is
/// tried as a document first; if that fails the whole text is parsed, so
/// pretty-printed single documents also work.
pub fn parse_snapshot(bytes: &[u8]) -> Result<ReportSnapshot> {
    let text = decode_text(bytes)?;
    let first_line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(DashboardError::EmptyDocument)?;
    match serde_json::from_str(first_line) {
        Ok(snapshot) => Ok(snapshot),
        Err(line_err) => serde_json::from_str(&text).map_err(|_| DashboardError::Json(line_err)),
    }
}

fn decode_text(bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(bytes).read_to_string(&mut text)?;
        Ok(text)
    } else {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| DashboardError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

/// Read and decode a report file.
pub fn load_snapshot(path: &Path) -> Result<ReportSnapshot> {
    let bytes = std::fs::read(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&bytes).map_err(|e| match e {
        DashboardError::Json(err) => DashboardError::malformed(path, err.to_string()),
        DashboardError::EmptyDocument => DashboardError::malformed(path, "document is empty"),
        DashboardError::Io(err) => DashboardError::malformed(path, err.to_string()),
        other => other,
    })
}

/// Where each platform's report lives; `None` means "no report".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub mac: Option<PathBuf>,
    pub windows: Option<PathBuf>,
    pub linux: Option<PathBuf>,
}

impl SnapshotPaths {
    #[must_use]
    pub const fn get(&self, platform: Platform) -> Option<&PathBuf> {
        match platform {
            Platform::Mac => self.mac.as_ref(),
            Platform::Windows => self.windows.as_ref(),
            Platform::Linux => self.linux.as_ref(),
        }
    }

    pub fn set(&mut self, platform: Platform, path: PathBuf) {
        let slot = match platform {
            Platform::Mac => &mut self.mac,
            Platform::Windows => &mut self.windows,
            Platform::Linux => &mut self.linux,
        };
        *slot = Some(path);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Platform::ALL.iter().all(|p| self.get(*p).is_none())
    }
}

/// Probe `<root>/<platform>/latest_data.*` for every platform.
///
/// `macos/` is accepted as an alias of `mac/`.
#[must_use]
pub fn discover(root: &Path) -> SnapshotPaths {
    let mut paths = SnapshotPaths::default();
    for platform in Platform::ALL {
        let dirs: &[&str] = match platform {
            Platform::Mac => &["mac", "macos"],
            Platform::Windows => &["windows"],
            Platform::Linux => &["linux"],
        };
        let found = dirs
            .iter()
            .flat_map(|dir| LATEST_FILE_NAMES.iter().map(move |name| root.join(dir).join(name)))
            .find(|candidate| candidate.is_file());
        match found {
            Some(path) => paths.set(platform, path),
            None => warn!(%platform, root = %root.display(), "no report found for platform"),
        }
    }
    paths
}

/// Load every configured platform into an aggregate.
///
/// A configured path that does not exist leaves the platform absent.
pub fn load_aggregate(paths: &SnapshotPaths) -> Result<DashboardAggregate> {
    let mut aggregate = DashboardAggregate::new();
    for platform in Platform::ALL {
        let Some(path) = paths.get(platform) else {
            continue;
        };
        if !path.exists() {
            warn!(%platform, path = %path.display(), "report file missing; platform excluded");
            continue;
        }
        let snapshot = load_snapshot(path)?;
        for issue in validate_snapshot(&snapshot) {
            warn!(%platform, %issue, "report inconsistency tolerated");
        }
        info!(
            %platform,
            run_id = %snapshot.run_id,
            packages = snapshot.sources.len(),
            "loaded report"
        );
        aggregate = aggregate.with_snapshot(platform, snapshot);
    }
    if aggregate.is_empty() {
        return Err(DashboardError::NoSnapshots);
    }
    for issue in check_alignment(&aggregate) {
        warn!(%issue, "cross-platform inconsistency tolerated");
    }
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    const DOC: &str = r#"{"run_id":"1","run_number":"2","start_time":"t","sources":[{"Git":{"url":"https://example.com/r","rev":["main"],"index":0}}],"stable_toolchain_version":{"label":"Stable","moon_version":"m","moonc_version":"c"},"stable_release_data":[{"source":0,"cbts":[null]}],"bleeding_toolchain_version":{"label":"Bleeding","moon_version":"m","moonc_version":"c"},"bleeding_release_data":[]}"#;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn parses_plain_jsonl() {
        let snap = parse_snapshot(format!("\n{DOC}\n").as_bytes()).unwrap();
        assert_eq!(snap.run_id, "1");
        assert_eq!(snap.sources.len(), 1);
    }

    #[test]
    fn parses_gzip_jsonl() {
        let snap = parse_snapshot(&gzip(&format!("{DOC}\n"))).unwrap();
        assert_eq!(snap.run_number, "2");
    }

    #[test]
    fn parses_pretty_printed_document() {
        let value: serde_json::Value = serde_json::from_str(DOC).unwrap();
        let pretty = serde_json::to_string_pretty(&value).unwrap();
        let snap = parse_snapshot(pretty.as_bytes()).unwrap();
        assert_eq!(snap.start_time, "t");
    }

    #[test]
    fn empty_document_is_error() {
        assert!(matches!(
            parse_snapshot(b"\n  \n"),
            Err(DashboardError::EmptyDocument)
        ));
    }

    #[test]
    fn malformed_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"run_id\": 1}").unwrap();
        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedDocument { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn discover_and_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("macos")).unwrap();
        std::fs::create_dir_all(dir.path().join("linux")).unwrap();
        std::fs::write(dir.path().join("macos/latest_data.jsonl.gz"), gzip(DOC)).unwrap();
        std::fs::write(dir.path().join("linux/latest_data.json"), DOC).unwrap();

        let paths = discover(dir.path());
        assert!(paths.mac.is_some());
        assert!(paths.windows.is_none());
        assert!(paths.linux.is_some());

        let agg = load_aggregate(&paths).unwrap();
        let present: Vec<_> = agg.present_platforms().collect();
        assert_eq!(present, [Platform::Mac, Platform::Linux]);
        assert_eq!(agg.package_count(), 1);
    }

    #[test]
    fn missing_files_leave_platform_absent() {
        let dir = tempfile::tempdir().unwrap();
        let linux = dir.path().join("linux.json");
        std::fs::write(&linux, DOC).unwrap();
        let mut paths = SnapshotPaths::default();
        paths.set(Platform::Linux, linux);
        paths.set(Platform::Windows, dir.path().join("nope.json"));
        let agg = load_aggregate(&paths).unwrap();
        assert!(agg.snapshot(Platform::Windows).is_none());
        assert!(agg.snapshot(Platform::Linux).is_some());
    }

    #[test]
    fn nothing_loaded_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = SnapshotPaths::default();
        paths.set(Platform::Mac, dir.path().join("absent.json"));
        assert!(matches!(
            load_aggregate(&paths),
            Err(DashboardError::NoSnapshots)
        ));
        assert!(SnapshotPaths::default().is_empty());
    }
}
