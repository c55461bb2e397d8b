//! Console line encoder.
//!
//! Every record becomes one tab-separated line:
//!
//! ```text
//! 2024-05-01T12:00:00.123+0200	INFO	src/main.rs:42	server started	{"port":8080}
//! ```
//!
//! The trailing JSON object only appears when the event carries fields other
//! than the ones the facade sets itself.

use chrono::Local;
use serde_json::{Map, Value};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Timestamp layout: ISO-8601, millisecond precision, numeric UTC offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Field carrying the facade's own severity label.
pub(crate) const SEVERITY_FIELD: &str = "severity";
/// Field carrying the caller location captured by the facade.
pub(crate) const CALLER_FIELD: &str = "caller";

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEncoder;

impl<S, N> FormatEvent<S, N> for ConsoleEncoder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut record = RecordVisitor::default();
        event.record(&mut record);

        let metadata = event.metadata();
        let level = record
            .severity
            .unwrap_or_else(|| metadata.level().as_str().to_string());
        let caller = record.caller.unwrap_or_else(|| match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => format!("{}:{}", short_path(file), line),
            _ => metadata.target().to_string(),
        });

        write!(
            writer,
            "{}\t{}\t{}\t{}",
            Local::now().format(TIMESTAMP_FORMAT),
            level,
            caller,
            record.message
        )?;
        if !record.fields.is_empty() {
            write!(writer, "\t{}", Value::Object(record.fields))?;
        }
        writeln!(writer)
    }
}

/// Keep the last two components of a source path, `dir/file.rs`.
pub fn short_path(path: &str) -> &str {
    let mut separators = path
        .rmatch_indices(|c: char| c == '/' || c == '\\')
        .map(|(i, _)| i);
    separators.next();
    match separators.next() {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    severity: Option<String>,
    caller: Option<String>,
    fields: Map<String, Value>,
}

impl RecordVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            SEVERITY_FIELD => self.severity = Some(value.to_string()),
            CALLER_FIELD => self.caller = Some(value.to_string()),
            _ => self.insert(field, Value::from(value)),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{:?}", value);
        match field.name() {
            "message" => self.message = text,
            SEVERITY_FIELD => self.severity = Some(text),
            CALLER_FIELD => self.caller = Some(text),
            _ => self.insert(field, Value::from(text)),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}
