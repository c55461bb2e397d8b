//! Logger configuration.

use crate::error::Result;
use crate::sink::SharedWriter;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Default rotation size in megabytes.
pub const DEFAULT_MAX_SIZE_MB: i64 = 100;
/// Default number of rotated files kept.
pub const DEFAULT_MAX_BACKUPS: i64 = 3;
/// Default age in days after which rotated files are removed.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// Where records are written.
#[derive(Debug, Clone)]
pub enum Destination {
    /// A rotating log file at this path.
    File(PathBuf),
    /// Any byte sink, used as is.
    Writer(SharedWriter),
}

impl Destination {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Destination::File(path.into())
    }

    pub fn writer<W: std::io::Write + Send + 'static>(writer: W) -> Self {
        Destination::Writer(SharedWriter::new(writer))
    }
}

// Only the path form can come from a config file.
impl<'de> Deserialize<'de> for Destination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        PathBuf::deserialize(deserializer).map(Destination::File)
    }
}

/// What a `fatal` record does after it has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFatal {
    /// Terminate the process with exit status 1.
    #[default]
    Exit,
    /// Unwind with a panic carrying the message.
    Panic,
}

/// Logger configuration.
///
/// Thresholds are signed so that zero and negative values can be told apart
/// from real limits; any non-positive threshold is replaced by its default
/// when a logger is built.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    #[serde(rename = "filename")]
    pub destination: Option<Destination>,
    /// Size in megabytes at which the file is rotated.
    pub max_size: i64,
    /// Number of rotated files to keep.
    pub max_backups: i64,
    /// Age in days after which rotated files are deleted.
    pub max_age: i64,
    /// Gzip rotated files.
    pub compress: bool,
    /// Make `dpanic` records panic.
    pub development: bool,
    pub on_fatal: OnFatal,
}

impl LogConfig {
    /// Config writing to a rotating file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            destination: Some(Destination::file(path)),
            ..Self::default()
        }
    }

    /// Config writing to `writer`.
    pub fn writer<W: std::io::Write + Send + 'static>(writer: W) -> Self {
        Self {
            destination: Some(Destination::writer(writer)),
            ..Self::default()
        }
    }

    /// Returns the config with every non-positive threshold replaced by its default.
    pub fn with_defaults(mut self) -> Self {
        if self.max_age <= 0 {
            self.max_age = DEFAULT_MAX_AGE_DAYS;
        }
        if self.max_backups <= 0 {
            self.max_backups = DEFAULT_MAX_BACKUPS;
        }
        if self.max_size <= 0 {
            self.max_size = DEFAULT_MAX_SIZE_MB;
        }
        self
    }

    /// Parse a JSON config. The destination is read from the `filename` key.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config from disk.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
