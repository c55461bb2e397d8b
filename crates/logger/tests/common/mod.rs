//! Shared helpers for tests that install the default logger.

#![allow(dead_code)]

use quill_logger::{init_default_logger, LogConfig, Severity};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

/// Serialise tests that replace the default logger.
pub fn serial() -> MutexGuard<'static, ()> {
    GLOBAL_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory sink whose clones share one buffer.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Install a default logger writing into a fresh capture buffer.
pub fn install_capture(threshold: Severity) -> Capture {
    let capture = Capture::default();
    init_default_logger(LogConfig::writer(capture.clone()), threshold);
    capture
}

/// Tab-separated columns of one console line.
pub fn columns(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}
