//! Process-wide logging facade over `tracing`.
//!
//! A [`Logger`] writes tab-separated console lines into either a rotating log
//! file or any byte sink. One logger is installed as the process default and
//! backs the free functions ([`info`], [`warnf`], ...) and the `*f!` macros.
//!
//! ```rust,no_run
//! use quill_logger::{init_default_logger, infof, LogConfig, Severity};
//!
//! let config = LogConfig {
//!     max_size: 50,
//!     compress: true,
//!     ..LogConfig::file("/var/log/app/app.log")
//! };
//! init_default_logger(config, Severity::Info);
//!
//! quill_logger::info("service started");
//! infof!("listening on port {}", 8080);
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod global;
pub mod level;
pub mod logger;
pub mod rolling;
pub mod sink;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use config::{Destination, LogConfig, OnFatal};
pub use error::{LogError, Result};
pub use global::{
    debug, debugf, default_dispatch, default_logger, default_sugar, dpanic, dpanicf, error,
    errorf, fatal, fatalf, flush, info, infof, init_default_logger, log, panic, panicf,
    set_default_logger, warn, warnf,
};
pub use level::Severity;
pub use logger::{Logger, SugaredLogger};
pub use rolling::{RollingFile, RotationPolicy};
pub use sink::{resolve_sink, SharedWriter};
pub use writer::{LevelWriter, NullWriter};

/// Log a `debug` record through the default logger, `format!` style.
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::global::debugf(::std::format_args!($($arg)+))
    };
}

/// Log an `info` record through the default logger, `format!` style.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::global::infof(::std::format_args!($($arg)+))
    };
}

/// Log a `warn` record through the default logger, `format!` style.
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::global::warnf(::std::format_args!($($arg)+))
    };
}

/// Log an `error` record through the default logger, `format!` style.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::global::errorf(::std::format_args!($($arg)+))
    };
}

/// Log a `dpanic` record through the default logger, `format!` style.
#[macro_export]
macro_rules! dpanicf {
    ($($arg:tt)+) => {
        $crate::global::dpanicf(::std::format_args!($($arg)+))
    };
}

/// Log a `panic` record through the default logger and panic.
#[macro_export]
macro_rules! panicf {
    ($($arg:tt)+) => {
        $crate::global::panicf(::std::format_args!($($arg)+))
    };
}

/// Log a `fatal` record through the default logger and terminate.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::global::fatalf(::std::format_args!($($arg)+))
    };
}
