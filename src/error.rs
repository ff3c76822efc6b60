// src/error.rs
use std::path::PathBuf;

/// A page could not be read.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{url} gave empty responses in all {attempts} attempts")]
    EmptyResponse { url: String, attempts: u32 },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Snapshot / table persistence failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot {}: {source}", .path.display())]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Bad command line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: &'static str, value: String },
    #[error("unknown arg: {0}")]
    UnknownArg(String),
    #[error("{0} is required")]
    Required(&'static str),
}

/// Anything a full run can fail with.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}
