//! Rotating log file sink.
//!
//! Size-triggered rotation, backup counting and gzip compression are done by
//! `file-rotate`. Rotated files older than the configured age are removed here,
//! when the file is opened and then at most once per [`PRUNE_INTERVAL`].

use crate::config::LogConfig;
use crate::error::{LogError, Result};
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

const MEGABYTE: u64 = 1024 * 1024;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// How often rotated files are checked against the age limit while writing.
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Limits applied to a [`RollingFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_size_bytes: u64,
    pub max_backups: usize,
    pub max_age: Duration,
    pub compress: bool,
}

impl RotationPolicy {
    /// Policy for `config`, with defaults applied to non-positive thresholds.
    pub fn from_config(config: &LogConfig) -> Self {
        let config = config.clone().with_defaults();
        // Thresholds are positive after defaulting; huge ones saturate.
        let megabytes = u64::try_from(config.max_size).unwrap_or(u64::MAX);
        let days = u64::try_from(config.max_age).unwrap_or(u64::MAX);
        Self {
            max_size_bytes: megabytes.saturating_mul(MEGABYTE),
            max_backups: usize::try_from(config.max_backups).unwrap_or(usize::MAX),
            max_age: Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)),
            compress: config.compress,
        }
    }
}

/// Log file that rotates itself once it grows past the size limit.
pub struct RollingFile {
    path: PathBuf,
    policy: RotationPolicy,
    inner: FileRotate<AppendCount>,
    next_prune: Instant,
}

impl RollingFile {
    /// Open (or create) the log file at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let requested = path.as_ref();
        let open_error = |source: io::Error| LogError::OpenFile {
            path: requested.to_path_buf(),
            source,
        };

        if requested.as_os_str().is_empty() {
            return Err(open_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty log file path",
            )));
        }

        let path = std::path::absolute(requested).map_err(open_error)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(open_error)?;
        }
        // Surface permission and path errors here instead of on the first write.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(open_error)?;

        prune_expired(&path, policy.max_age).map_err(open_error)?;

        Ok(Self {
            inner: open_rotator(&path, &policy),
            path,
            policy,
            next_prune: Instant::now() + PRUNE_INTERVAL,
        })
    }

    /// Absolute path of the live log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Remove rotated files past the age limit. Returns how many were removed.
    pub fn prune(&mut self) -> io::Result<usize> {
        self.next_prune = Instant::now() + PRUNE_INTERVAL;
        let removed = prune_expired(&self.path, self.policy.max_age)?;
        if removed > 0 {
            // The rotator caches the suffixes it found on open.
            self.inner.flush()?;
            self.inner = open_rotator(&self.path, &self.policy);
        }
        Ok(removed)
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if Instant::now() >= self.next_prune {
            // `buf` is already written; a failed cleanup is retried next interval.
            let _ = self.prune();
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn open_rotator(path: &Path, policy: &RotationPolicy) -> FileRotate<AppendCount> {
    let compression = if policy.compress {
        Compression::OnRotate(0)
    } else {
        Compression::None
    };

    FileRotate::new(
        path,
        AppendCount::new(policy.max_backups),
        ContentLimit::BytesSurpassed(usize::try_from(policy.max_size_bytes).unwrap_or(usize::MAX)),
        compression,
        #[cfg(unix)]
        None,
    )
}

/// Delete `<file>.<n>[...]` siblings of `path` last modified more than `max_age` ago.
fn prune_expired(path: &Path, max_age: Duration) -> io::Result<usize> {
    let (Some(dir), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Ok(0);
    };
    let prefix = format!("{}.", file_name.to_string_lossy());
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let is_backup = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit());
        if !is_backup {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        let expired = now
            .duration_since(modified)
            .map(|age| age > max_age)
            .unwrap_or(false);
        if expired && fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }

    Ok(removed)
}
