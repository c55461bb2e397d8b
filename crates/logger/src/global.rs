//! Process-wide default logger.
//!
//! The slot is filled on first use with a logger built from an empty
//! [`LogConfig`] at [`Severity::Debug`], which writes to standard output.
//! [`init_default_logger`] replaces it at any time. Emission takes the shared
//! lock for the duration of one call; replacement takes the exclusive lock
//! only for the swap. The lock is not re-entrant: a [`LevelWriter`] must not
//! be the destination of the default logger.
//!
//! [`LevelWriter`]: crate::writer::LevelWriter

use crate::config::LogConfig;
use crate::level::Severity;
use crate::logger::{Logger, SugaredLogger};
use std::fmt;
use std::io;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard};
use tracing::Dispatch;

static DEFAULT_LOGGER: LazyLock<RwLock<Arc<Logger>>> = LazyLock::new(|| {
    RwLock::new(Arc::new(Logger::new(LogConfig::default(), Severity::Debug)))
});

fn current() -> RwLockReadGuard<'static, Arc<Logger>> {
    DEFAULT_LOGGER.read().unwrap_or_else(PoisonError::into_inner)
}

/// Build a logger from `config` and make it the process default.
pub fn init_default_logger(config: LogConfig, threshold: Severity) {
    set_default_logger(Logger::new(config, threshold));
}

/// Make an already built logger the process default.
pub fn set_default_logger(logger: Logger) {
    let logger = Arc::new(logger);
    *DEFAULT_LOGGER.write().unwrap_or_else(PoisonError::into_inner) = logger;
}

/// The current default logger.
pub fn default_logger() -> Arc<Logger> {
    Arc::clone(&current())
}

/// The structured engine of the current default logger.
pub fn default_dispatch() -> Dispatch {
    current().dispatch().clone()
}

/// The template front end of the current default logger.
pub fn default_sugar() -> SugaredLogger {
    current().sugar().clone()
}

/// Flush the current default logger's sink.
pub fn flush() -> io::Result<()> {
    current().flush()
}

/// Log through the default logger.
#[track_caller]
pub fn log(severity: Severity, args: fmt::Arguments<'_>) {
    current().log(severity, args);
}

macro_rules! global_severity_fns {
    ($($severity:ident => $plain:ident, $formatted:ident;)*) => {
        $(
            #[doc = concat!("Log `msg` at `", stringify!($severity), "` severity through the default logger.")]
            #[track_caller]
            pub fn $plain(msg: impl fmt::Display) {
                log(Severity::$severity, format_args!("{}", msg));
            }

            #[doc = concat!("Log pre-formatted arguments at `", stringify!($severity), "` severity through the default logger.")]
            #[track_caller]
            pub fn $formatted(args: fmt::Arguments<'_>) {
                log(Severity::$severity, args);
            }
        )*
    };
}

global_severity_fns! {
    Debug => debug, debugf;
    Info => info, infof;
    Warn => warn, warnf;
    Error => error, errorf;
    DPanic => dpanic, dpanicf;
    Panic => panic, panicf;
    Fatal => fatal, fatalf;
}
