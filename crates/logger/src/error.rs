//! Error types for logger construction.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    /// The configuration names neither a file nor a writer.
    #[error("log destination must be a file path or a writer")]
    MissingDestination,

    #[error("failed to open log file {path:?}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown severity {0:?}")]
    UnknownSeverity(String),

    #[error("invalid log config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LogError>;
