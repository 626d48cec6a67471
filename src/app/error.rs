use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds of a flattening run.
///
/// `ConfigLoad`, `DirectoryList`, `Stat` and `Copy` are recovered from where they occur;
/// `DestinationReset` and `SummaryWrite` abort the run.
#[derive(Error, Debug)]
pub enum PipeError {
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("Failed to reset destination folder '{path}': {source}")]
    DestinationReset {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read directory '{path}': {source}")]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to get stats for '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write summary '{path}': {source}")]
    SummaryWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
