//! `std::io::Write` adapters.

use crate::global;
use crate::level::Severity;
use std::io::{self, Write};

/// Turns raw byte writes into records on the default logger.
///
/// Useful for pointing another component's output stream at the facade. Each
/// `write` becomes exactly one record at the bound severity and always
/// reports the whole buffer as written. Its caller column is fixed to
/// `src/writer.rs`; use [`LevelWriter::emit`] to attribute a record to the
/// calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelWriter {
    severity: Severity,
}

impl LevelWriter {
    /// Bind to the severity named by `label`. Unknown or empty labels mean `info`.
    pub fn new(label: &str) -> Self {
        Self {
            severity: Severity::from_label(label),
        }
    }

    pub fn with_severity(severity: Severity) -> Self {
        Self { severity }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Emit `buf` as one record whose caller column names the code calling
    /// this method.
    ///
    /// Records written through [`Write`] carry this module's location instead:
    /// trait methods cannot report their caller.
    #[track_caller]
    pub fn emit(&self, buf: &[u8]) {
        let text = String::from_utf8_lossy(buf);
        let mut message: &str = &text;
        if let Some(rest) = message.strip_suffix('\n') {
            message = rest.strip_suffix('\r').unwrap_or(rest);
        }
        global::log(self.severity, format_args!("{}", message));
    }
}

impl Default for LevelWriter {
    fn default() -> Self {
        Self::new("")
    }
}

impl Write for LevelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.emit(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = global::flush();
        Ok(())
    }
}

/// Discards everything written to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWriter;

impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_writer_reports_full_length() {
        let mut sink = NullWriter;
        for len in [0, 1, 5, 4096] {
            assert_eq!(sink.write(&vec![b'z'; len]).unwrap(), len);
        }
        sink.write_all(b"anything").unwrap();
        sink.flush().unwrap();
    }

    #[test]
    fn test_level_writer_label_resolution() {
        assert_eq!(LevelWriter::new("warn").severity(), Severity::Warn);
        assert_eq!(LevelWriter::new("FATAL").severity(), Severity::Fatal);
        assert_eq!(LevelWriter::new("").severity(), Severity::Info);
        assert_eq!(LevelWriter::new("chatty").severity(), Severity::Info);
        assert_eq!(LevelWriter::default(), LevelWriter::new("info"));
    }
}
