//! `moondash`: diagnose a build dashboard from per-platform report files.
//!
//! Reports are found under `--data-dir` as `<platform>/latest_data.*`, or
//! given one by one with `--mac`, `--windows`, and `--linux`. Every package
//! gets one diagnosis line; a summary follows.

mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use moondash_core::{DashboardSummary, PackageReport, ParallelismConfig, Reconciler, build_reports};
use moondash_error::{DashboardError, Result};
use moondash_ingest::{SnapshotPaths, discover, load_aggregate};
use moondash_types::Platform;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    /// One aligned line per package, then a summary.
    #[default]
    Text,
    /// Pretty-printed JSON with reports, cells, and summary.
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "moondash", version)]
#[command(about = "Explain why packages pass or fail across platforms, backends, and toolchains")]
struct Args {
    /// Directory holding `<platform>/latest_data.jsonl.gz` reports
    #[arg(long, env = "MOONDASH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Explicit mac report (overrides --data-dir)
    #[arg(long, value_name = "FILE")]
    mac: Option<PathBuf>,

    /// Explicit windows report (overrides --data-dir)
    #[arg(long, value_name = "FILE")]
    windows: Option<PathBuf>,

    /// Explicit linux report (overrides --data-dir)
    #[arg(long, value_name = "FILE")]
    linux: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Worker threads for diagnosis (0 picks from available CPUs)
    #[arg(short, long, default_value_t = 0)]
    jobs: usize,

    /// Only list packages that did not pass
    #[arg(long)]
    failures_only: bool,

    /// Also write JSON-lines logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn snapshot_paths(&self) -> SnapshotPaths {
        let mut paths = self
            .data_dir
            .as_deref()
            .map(discover)
            .unwrap_or_default();
        for platform in Platform::ALL {
            let explicit = match platform {
                Platform::Mac => &self.mac,
                Platform::Windows => &self.windows,
                Platform::Linux => &self.linux,
            };
            if let Some(path) = explicit {
                paths.set(platform, path.clone());
            }
        }
        paths
    }

    fn parallelism(&self) -> ParallelismConfig {
        ParallelismConfig::new(self.jobs, 1).unwrap_or_default()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a DashboardSummary,
    packages: Vec<&'a PackageReport>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let code = match logging::init_logging(args.verbose, args.log_file.as_deref()) {
        Ok(()) => run(&args, &mut io::stdout().lock(), &mut io::stderr().lock()),
        Err(error) => report_error(&DashboardError::Io(error), &mut io::stderr().lock()),
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Execute one invocation; returns the process exit status.
fn run<W: Write, E: Write>(args: &Args, out: &mut W, err: &mut E) -> i32 {
    match execute(args, out) {
        Ok(()) => 0,
        Err(error) => report_error(&error, err),
    }
}

/// Print `error` and return its exit status. Hints are only shown for
/// errors the user can fix.
fn report_error<E: Write>(error: &DashboardError, err: &mut E) -> i32 {
    let _ = writeln!(err, "error: {error}");
    if let Some(hint) = error.suggestion().filter(|_| error.is_user_recoverable()) {
        let _ = writeln!(err, "hint: {hint}");
    }
    error.exit_code()
}

fn execute<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    if let Some(dir) = args.data_dir.as_deref().filter(|d| !d.is_dir()) {
        return Err(DashboardError::invalid_argument(
            "--data-dir",
            format!("{} is not a directory", dir.display()),
        ));
    }
    let aggregate = load_aggregate(&args.snapshot_paths())?;
    let reconciler = Reconciler::default();
    let reports = build_reports(&reconciler, &aggregate, args.parallelism());
    let summary = DashboardSummary::from_diagnoses(reports.iter().map(|r| &r.diagnosis));
    info!(
        packages = summary.total,
        passed = summary.passed(),
        failed = summary.failed(),
        "dashboard diagnosed"
    );

    let shown: Vec<&PackageReport> = reports
        .iter()
        .filter(|r| !args.failures_only || !r.diagnosis.is_success())
        .collect();

    match args.format {
        OutputFormat::Text => write_text(out, &shown, &summary)?,
        OutputFormat::Json => {
            let doc = JsonOutput {
                summary: &summary,
                packages: shown,
            };
            serde_json::to_writer_pretty(&mut *out, &doc)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(
    out: &mut W,
    reports: &[&PackageReport],
    summary: &DashboardSummary,
) -> io::Result<()> {
    let width = reports
        .iter()
        .filter_map(|r| r.label.as_deref())
        .map(str::len)
        .max()
        .unwrap_or(0);
    for report in reports {
        let label = report.label.as_deref().unwrap_or("?");
        writeln!(
            out,
            "{:>4}  {label:<width$}  {}",
            report.index, report.diagnosis
        )?;
    }
    if !reports.is_empty() {
        writeln!(out)?;
    }
    write!(out, "{}", summary.render_summary())
}
