//! Byte sinks and destination resolution.

use crate::config::{Destination, LogConfig};
use crate::error::{LogError, Result};
use crate::rolling::{RollingFile, RotationPolicy};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// A byte sink shared between clones, serialised by a mutex.
///
/// The engine asks for one writer per record and that writer holds the lock
/// until the record is fully written, so concurrent records never interleave.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedWriter {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// The process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Lock the sink for the duration of one record.
    pub fn lock(&self) -> SinkGuard<'_> {
        SinkGuard(self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// True when both handles write to the same sink.
    pub fn same_sink(&self, other: &SharedWriter) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SinkGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        self.lock()
    }
}

/// Exclusive access to a [`SharedWriter`] until dropped.
pub struct SinkGuard<'a>(MutexGuard<'a, Box<dyn Write + Send>>);

impl Write for SinkGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Turn the configured destination into a sink.
///
/// A path opens a [`RollingFile`] bounded by the config's thresholds; a writer
/// is used as is. A config without a destination is rejected.
pub fn resolve_sink(config: &LogConfig) -> Result<SharedWriter> {
    match &config.destination {
        Some(Destination::File(path)) => {
            let file = RollingFile::open(path, RotationPolicy::from_config(config))?;
            Ok(SharedWriter::new(file))
        }
        Some(Destination::Writer(writer)) => Ok(writer.clone()),
        None => Err(LogError::MissingDestination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CaptureBuffer;
    use std::fs;
    use std::thread;

    #[test]
    fn test_resolve_path_yields_rolling_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/app.log");

        let mut sink = resolve_sink(&LogConfig::file(&path)).unwrap();
        sink.write_all(b"hello\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_resolve_writer_is_used_verbatim() {
        let shared = SharedWriter::new(CaptureBuffer::default());
        let config = LogConfig {
            destination: Some(Destination::Writer(shared.clone())),
            ..LogConfig::default()
        };

        let resolved = resolve_sink(&config).unwrap();
        assert!(resolved.same_sink(&shared));
    }

    #[test]
    fn test_resolve_without_destination_fails() {
        let err = resolve_sink(&LogConfig::default()).unwrap_err();
        assert!(matches!(err, LogError::MissingDestination));
    }

    #[test]
    fn test_resolve_unopenable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let err = resolve_sink(&LogConfig::file(blocker.join("app.log"))).unwrap_err();
        assert!(matches!(err, LogError::OpenFile { .. }));
    }

    #[test]
    fn test_guarded_writes_do_not_interleave() {
        let buffer = CaptureBuffer::default();
        let shared = SharedWriter::new(buffer.clone());

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let line = [vec![b'a' + i; 100], vec![b'\n']].concat();
                    for _ in 0..50 {
                        let mut guard = shared.make_writer();
                        // Split on purpose: the guard must keep the record whole.
                        guard.write_all(&line[..50]).unwrap();
                        guard.write_all(&line[50..]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = buffer.lines();
        assert_eq!(lines.len(), 400);
        for line in lines {
            let first = line.as_bytes()[0];
            assert!(line.bytes().all(|b| b == first), "interleaved line: {}", line);
        }
    }
}
