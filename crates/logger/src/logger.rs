//! Logger handles.
//!
//! A [`Logger`] owns a `tracing` dispatch writing through the
//! [`ConsoleEncoder`] into its resolved sink, and a [`SugaredLogger`] over the
//! same dispatch for template-style calls.

use crate::config::{Destination, LogConfig, OnFatal};
use crate::encoder::{short_path, ConsoleEncoder};
use crate::error::Result;
use crate::level::Severity;
use crate::sink::{resolve_sink, SharedWriter};
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use tracing::{dispatcher, Dispatch, Level};

const TARGET: &str = "quill";

macro_rules! emit {
    ($level:expr, $label:expr, $caller:expr, $message:expr) => {
        tracing::event!(target: TARGET, $level, severity = $label, caller = $caller, "{}", $message)
    };
}

/// Generates the plain and formatted method for each severity, all routed
/// through `self.log`.
macro_rules! severity_methods {
    ($($severity:ident => $plain:ident, $formatted:ident;)*) => {
        $(
            #[doc = concat!("Log `msg` at `", stringify!($severity), "` severity.")]
            #[track_caller]
            pub fn $plain(&self, msg: impl fmt::Display) {
                self.log(Severity::$severity, format_args!("{}", msg));
            }

            #[doc = concat!("Log pre-formatted arguments at `", stringify!($severity), "` severity.")]
            #[track_caller]
            pub fn $formatted(&self, args: fmt::Arguments<'_>) {
                self.log(Severity::$severity, args);
            }
        )*
    };
}

/// Template-style front end.
///
/// Cheap to clone; every clone writes through the same dispatch and sink.
#[derive(Debug, Clone)]
pub struct SugaredLogger {
    dispatch: Dispatch,
    sink: SharedWriter,
    threshold: Severity,
    development: bool,
    on_fatal: OnFatal,
}

impl SugaredLogger {
    /// Whether a record at `severity` is written.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold
    }

    /// Write one record, then escalate `panic`, `fatal` and (in development)
    /// `dpanic`. The caller column is the location calling this method.
    #[track_caller]
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let location = Location::caller();
        let message = match args.as_str() {
            Some(text) => text.to_string(),
            None => args.to_string(),
        };

        if self.enabled(severity) {
            self.write_record(severity, location, &message);
        }
        self.escalate(severity, message);
    }

    severity_methods! {
        Debug => debug, debugf;
        Info => info, infof;
        Warn => warn, warnf;
        Error => error, errorf;
        DPanic => dpanic, dpanicf;
        Panic => panic, panicf;
        Fatal => fatal, fatalf;
    }

    fn write_record(&self, severity: Severity, location: &Location<'_>, message: &str) {
        let caller = format!("{}:{}", short_path(location.file()), location.line());
        let caller = caller.as_str();
        let label = severity.as_str();

        dispatcher::with_default(&self.dispatch, || match severity {
            Severity::Debug => emit!(Level::DEBUG, label, caller, message),
            Severity::Info => emit!(Level::INFO, label, caller, message),
            Severity::Warn => emit!(Level::WARN, label, caller, message),
            Severity::Error | Severity::DPanic | Severity::Panic | Severity::Fatal => {
                emit!(Level::ERROR, label, caller, message)
            }
        });
    }

    fn escalate(&self, severity: Severity, message: String) {
        match severity {
            Severity::Panic => panic!("{}", message),
            Severity::DPanic if self.development => panic!("{}", message),
            Severity::Fatal => {
                let _ = self.sink.lock().flush();
                match self.on_fatal {
                    OnFatal::Exit => std::process::exit(1),
                    OnFatal::Panic => panic!("{}", message),
                }
            }
            _ => {}
        }
    }
}

/// A configured logger: engine, template front end, sink and the resolved config.
#[derive(Debug)]
pub struct Logger {
    dispatch: Dispatch,
    sugar: SugaredLogger,
    sink: SharedWriter,
    config: LogConfig,
    threshold: Severity,
}

impl Logger {
    /// Build a logger writing records at `threshold` or above.
    ///
    /// Non-positive rotation thresholds get their defaults. If the destination
    /// cannot be resolved the logger silently writes to standard output
    /// instead; see [`Logger::try_new`] to detect that case.
    ///
    /// # Panics
    /// If the standard output fallback cannot be resolved either.
    pub fn new(config: LogConfig, threshold: Severity) -> Self {
        let mut config = config.with_defaults();
        let sink = match resolve_sink(&config) {
            Ok(sink) => sink,
            Err(_) => {
                config.destination = Some(Destination::Writer(SharedWriter::stdout()));
                match resolve_sink(&config) {
                    Ok(sink) => sink,
                    Err(err) => panic!("failed to enable fallback log writer: {}", err),
                }
            }
        };
        Self::with_sink(config, sink, threshold)
    }

    /// Like [`Logger::new`], but returns the resolution error instead of
    /// falling back to standard output.
    pub fn try_new(config: LogConfig, threshold: Severity) -> Result<Self> {
        let config = config.with_defaults();
        let sink = resolve_sink(&config)?;
        Ok(Self::with_sink(config, sink, threshold))
    }

    fn with_sink(config: LogConfig, sink: SharedWriter, threshold: Severity) -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .with_max_level(threshold.as_level_filter())
            .event_format(ConsoleEncoder)
            .finish();
        let dispatch = Dispatch::new(subscriber);

        let sugar = SugaredLogger {
            dispatch: dispatch.clone(),
            sink: sink.clone(),
            threshold,
            development: config.development,
            on_fatal: config.on_fatal,
        };

        Self {
            dispatch,
            sugar,
            sink,
            config,
            threshold,
        }
    }

    /// The structured engine, for direct use with `tracing` macros.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// The template-style front end.
    pub fn sugar(&self) -> &SugaredLogger {
        &self.sugar
    }

    pub fn sink(&self) -> &SharedWriter {
        &self.sink
    }

    /// The config this logger was built from, after defaulting and fallback.
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Flush buffered output in the sink.
    pub fn flush(&self) -> io::Result<()> {
        self.sink.lock().flush()
    }

    #[track_caller]
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.sugar.log(severity, args);
    }

    severity_methods! {
        Debug => debug, debugf;
        Info => info, infof;
        Warn => warn, warnf;
        Error => error, errorf;
        DPanic => dpanic, dpanicf;
        Panic => panic, panicf;
        Fatal => fatal, fatalf;
    }
}
