//! Severity levels.

use crate::error::LogError;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use tracing::Level;
use tracing::level_filters::LevelFilter;

/// Ordinal severity of a record.
///
/// `DPanic`, `Panic` and `Fatal` are emitted at the engine's `ERROR` level;
/// their own label travels with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    DPanic,
    Panic,
    Fatal,
}

impl Severity {
    /// Capitalised label used by the encoder.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::DPanic => "DPANIC",
            Severity::Panic => "PANIC",
            Severity::Fatal => "FATAL",
        }
    }

    /// Lenient parse: unknown or empty labels fall back to `Info`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Severity::Info)
    }

    /// Engine level this severity is emitted at.
    pub fn as_level(&self) -> Level {
        match self {
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Warn => Level::WARN,
            Severity::Error | Severity::DPanic | Severity::Panic | Severity::Fatal => Level::ERROR,
        }
    }

    /// Most verbose engine level let through when `self` is the threshold.
    pub fn as_level_filter(&self) -> LevelFilter {
        LevelFilter::from_level(self.as_level())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "dpanic" => Ok(Severity::DPanic),
            "panic" => Ok(Severity::Panic),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(LogError::UnknownSeverity(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::DPanic);
        assert!(Severity::DPanic < Severity::Panic);
        assert!(Severity::Panic < Severity::Fatal);
    }

    #[test]
    fn test_labels_are_capitalised() {
        assert_eq!(Severity::Debug.as_str(), "DEBUG");
        assert_eq!(Severity::DPanic.as_str(), "DPANIC");
        assert_eq!(Severity::Fatal.to_string(), "FATAL");
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("dpanic".parse::<Severity>().unwrap(), Severity::DPanic);
        assert!(matches!(
            "verbose".parse::<Severity>(),
            Err(LogError::UnknownSeverity(label)) if label == "verbose"
        ));
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn test_lenient_label_defaults_to_info() {
        assert_eq!(Severity::from_label(""), Severity::Info);
        assert_eq!(Severity::from_label("nonsense"), Severity::Info);
        assert_eq!(Severity::from_label("ERROR"), Severity::Error);
    }

    #[test]
    fn test_engine_levels() {
        assert_eq!(Severity::Info.as_level(), Level::INFO);
        assert_eq!(Severity::Fatal.as_level(), Level::ERROR);
        assert_eq!(Severity::Debug.as_level_filter(), LevelFilter::DEBUG);
        assert_eq!(Severity::DPanic.as_level_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn test_deserialize_from_json() {
        let level: Severity = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level, Severity::Warn);
        assert!(serde_json::from_str::<Severity>("\"loud\"").is_err());
    }
}
