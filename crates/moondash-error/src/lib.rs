use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for moondash ingestion and command-line operations.
///
/// The reconciliation engine never produces one of these: every lookup it
/// performs degrades to an absent value. Errors only arise while turning
/// documents on disk into a typed dashboard, or while parsing arguments.
#[derive(Error, Debug)]
pub enum DashboardError {
    // === I/O Errors ===
    /// Generic I/O failure without a known path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A report document exists but could not be read.
    #[error("cannot read report '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Document Errors ===
    /// The document was read but does not have the report shape.
    #[error("malformed report '{path}': {detail}")]
    MalformedDocument { path: PathBuf, detail: String },

    /// JSON decoding failed outside of a file context.
    #[error("invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document contained no JSON line at all.
    #[error("report document is empty")]
    EmptyDocument,

    /// None of the platforms produced a snapshot.
    #[error("no platform snapshot could be loaded")]
    NoSnapshots,

    // === Usage Errors ===
    /// A command-line flag carried an unusable value.
    #[error("invalid value for {flag}: {detail}")]
    InvalidArgument { flag: String, detail: String },
}

impl DashboardError {
    /// Whether the user can likely fix this without code changes.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. }
                | Self::MalformedDocument { .. }
                | Self::EmptyDocument
                | Self::NoSnapshots
                | Self::InvalidArgument { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::FileRead { .. } => Some("Check that the report file exists and is readable"),
            Self::MalformedDocument { .. } | Self::Json(_) | Self::EmptyDocument => {
                Some("Re-download the report; it may be truncated or from an older collector")
            }
            Self::NoSnapshots => {
                Some("Pass --data-dir or at least one of --mac, --windows, --linux")
            }
            Self::InvalidArgument { .. } => Some("Run with --help to see accepted values"),
            Self::Io(_) => None,
        }
    }

    /// Get the process exit code for this error (for CLI use).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::Io(_) | Self::FileRead { .. } => 3,
            Self::MalformedDocument { .. } | Self::Json(_) | Self::EmptyDocument => 4,
            Self::NoSnapshots => 5,
        }
    }

    /// Create a malformed-document error.
    pub fn malformed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(flag: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidArgument {
            flag: flag.into(),
            detail: detail.into(),
        }
    }
}

/// Result type alias using `DashboardError`.
pub type Result<T> = std::result::Result<T, DashboardError>;
