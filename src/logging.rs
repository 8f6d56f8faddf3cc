//! Debug log sinks.
//!
//! A client built with `debug(true)` reports each request, response and
//! failure to its [`LogSink`]. With `debug(false)` the sink is never called.
//! Sinks observe only; nothing they do can change the outcome of a call.
//!
//! | Sink | Description |
//! |------|-------------|
//! | [`TracingLogSink`] | Default; forwards records as `tracing` events |
//! | [`NoopLogSink`] | Discards everything |
//! | [`InMemoryLogSink`] | Keeps records in memory, for tests |
//! | [`FnLogSink`] | Adapts a closure |

use crate::endpoint::Endpoint;
use crate::sign::ParameterMap;
use std::sync::{Arc, RwLock};

/// Longest value that is copied verbatim into a log record.
const MAX_LOGGED_VALUE: usize = 64;

/// What happened at one step of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// About to POST. Long values (images) are truncated.
    Request { url: String, params: ParameterMap },
    /// The service answered.
    Response { status: u16, body: String },
    /// The call failed at any stage.
    Failure { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub endpoint: Endpoint,
    pub event: LogEvent,
}

impl LogRecord {
    pub fn request(endpoint: Endpoint, url: &str, params: &ParameterMap) -> Self {
        let params = params
            .iter()
            .map(|(k, v)| (k.clone(), truncate(v)))
            .collect();
        Self {
            endpoint,
            event: LogEvent::Request {
                url: url.to_string(),
                params,
            },
        }
    }

    pub fn response(endpoint: Endpoint, status: u16, body: &str) -> Self {
        Self {
            endpoint,
            event: LogEvent::Response {
                status,
                body: truncate(body),
            },
        }
    }

    pub fn failure(endpoint: Endpoint, err: &crate::Error) -> Self {
        Self {
            endpoint,
            event: LogEvent::Failure {
                message: err.to_string(),
            },
        }
    }
}

fn truncate(value: &str) -> String {
    if value.len() <= MAX_LOGGED_VALUE {
        return value.to_string();
    }
    let mut end = MAX_LOGGED_VALUE;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...({} bytes)", &value[..end], value.len())
}

/// Destination for debug records.
pub trait LogSink: Send + Sync {
    fn log(&self, record: &LogRecord);
}

/// Forwards records to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, record: &LogRecord) {
        let endpoint = record.endpoint.name();
        match &record.event {
            LogEvent::Request { url, params } => {
                tracing::debug!(endpoint, %url, ?params, "request");
            }
            LogEvent::Response { status, body } => {
                tracing::debug!(endpoint, status, %body, "response");
            }
            LogEvent::Failure { message } => {
                tracing::debug!(endpoint, %message, "failure");
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn log(&self, _record: &LogRecord) {}
}

pub fn noop_sink() -> Arc<dyn LogSink> {
    Arc::new(NoopLogSink)
}

/// In-memory sink for testing.
#[derive(Debug, Default)]
pub struct InMemoryLogSink {
    records: RwLock<Vec<LogRecord>>,
}

impl InMemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.write() {
            records.clear();
        }
    }
}

impl LogSink for InMemoryLogSink {
    fn log(&self, record: &LogRecord) {
        if let Ok(mut records) = self.records.write() {
            records.push(record.clone());
        }
    }
}

/// Wraps a closure, for callers that already have a logging callback.
pub struct FnLogSink<F>(pub F);

impl<F> LogSink for FnLogSink<F>
where
    F: Fn(&LogRecord) + Send + Sync,
{
    fn log(&self, record: &LogRecord) {
        (self.0)(record)
    }
}

pub fn tracing_sink() -> Arc<dyn LogSink> {
    Arc::new(TracingLogSink)
}

/// Calls the sink only when debug logging is on.
#[derive(Clone)]
pub(crate) struct DebugLog {
    enabled: bool,
    sink: Arc<dyn LogSink>,
}

impl DebugLog {
    /// With debug off the supplied sink is dropped and never held.
    pub(crate) fn new(enabled: bool, sink: Arc<dyn LogSink>) -> Self {
        let sink = if enabled { sink } else { noop_sink() };
        Self { enabled, sink }
    }

    pub(crate) fn emit(&self, record: impl FnOnce() -> LogRecord) {
        if self.enabled {
            self.sink.log(&record());
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }
}

impl std::fmt::Debug for DebugLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugLog")
            .field("enabled", &self.enabled)
            .finish()
    }
}
