//! Timing and structured logging around an operation.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::Level;

use super::{Middleware, Operation};
use crate::Error;

/// Label used when no [`LogContext`] method is given.
pub const DEFAULT_OPERATION_LABEL: &str = "API call";
/// Error field value for failures that carry no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Structured fields attached to a log event.
pub type Fields = serde_json::Map<String, Value>;

/// Destination for the events emitted by [`Logger`].
pub trait LogSink: Send + Sync {
    fn log_event(&self, level: Level, message: &str, fields: &Fields);
}

/// Forwards events to `tracing`, with the fields rendered as one JSON value.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log_event(&self, level: Level, message: &str, fields: &Fields) {
        let fields = Value::Object(fields.clone());
        if level == Level::ERROR {
            tracing::error!(fields = %fields, "{}", message);
        } else if level == Level::WARN {
            tracing::warn!(fields = %fields, "{}", message);
        } else if level == Level::INFO {
            tracing::info!(fields = %fields, "{}", message);
        } else if level == Level::DEBUG {
            tracing::debug!(fields = %fields, "{}", message);
        } else {
            tracing::trace!(fields = %fields, "{}", message);
        }
    }
}

/// One captured event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

/// Keeps every event in memory. Useful for asserting on what was logged.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events logged so far, oldest first.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl LogSink for MemorySink {
    fn log_event(&self, level: Level, message: &str, fields: &Fields) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(LogEvent {
                level,
                message: message.to_string(),
                fields: fields.clone(),
            });
    }
}

/// Describes the wrapped operation in log output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    /// HTTP method or operation name.
    pub method: Option<String>,
    /// Target being called.
    pub url: Option<String>,
}

impl LogContext {
    pub fn new(method: &str) -> Self {
        Self {
            method: Some(method.to_string()),
            url: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    fn label(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_OPERATION_LABEL)
    }

    fn url_field(&self) -> Value {
        self.url.clone().map(Value::String).unwrap_or(Value::Null)
    }
}

/// Logs a start event, then a success or error event with the elapsed time.
///
/// Failures are returned exactly as the inner operation produced them.
pub struct Logger<O> {
    inner: O,
    context: LogContext,
    sink: Arc<dyn LogSink>,
}

impl<O> Logger<O> {
    /// Logger that writes to `tracing`.
    pub fn new(inner: O, context: Option<LogContext>) -> Self {
        Self::with_sink(inner, context, Arc::new(TracingSink))
    }

    pub fn with_sink(inner: O, context: Option<LogContext>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner,
            context: context.unwrap_or_default(),
            sink,
        }
    }
}

#[async_trait]
impl<A, O> Operation<A> for Logger<O>
where
    A: Serialize + Send + 'static,
    O: Operation<A>,
    O::Output: Serialize,
{
    type Output = O::Output;

    async fn call(&self, args: A) -> Result<Self::Output, Error> {
        let started = Instant::now();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut fields = Fields::new();
        fields.insert("url".into(), self.context.url_field());
        fields.insert("args".into(), first_argument(&args));
        self.sink.log_event(
            Level::INFO,
            &format!("[{}] Starting {}", timestamp, self.context.label()),
            &fields,
        );

        let outcome = self.inner.call(args).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let mut fields = Fields::new();
        fields.insert("url".into(), self.context.url_field());
        fields.insert("durationMs".into(), duration_ms.into());

        match &outcome {
            Ok(result) => {
                let value = serde_json::to_value(result).unwrap_or(Value::Null);
                fields.insert("resultType".into(), json_type(&value).into());
                fields.insert("hasData".into(), has_data(&value).into());
                self.sink.log_event(
                    Level::INFO,
                    &format!("[{}] Success ({}ms)", timestamp, duration_ms),
                    &fields,
                );
            }
            Err(err) => {
                let message = err.message().unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                fields.insert("error".into(), message.into());
                self.sink.log_event(
                    Level::ERROR,
                    &format!("[{}] Error ({}ms)", timestamp, duration_ms),
                    &fields,
                );
            }
        }

        outcome
    }
}

/// Middleware form of [`Logger`], for use with [`compose`](super::compose).
pub fn logger<A, R>(context: Option<LogContext>, sink: Arc<dyn LogSink>) -> Middleware<A, R>
where
    A: Serialize + Send + 'static,
    R: Serialize + Send + 'static,
{
    Box::new(move |inner| Arc::new(Logger::with_sink(inner, context.clone(), sink.clone())))
}

/// First positional argument, as JSON. Argument tuples and lists serialize
/// as arrays; a bare value is its own first argument; `()` has none.
fn first_argument<A: Serialize>(args: &A) -> Value {
    match serde_json::to_value(args) {
        Ok(Value::Array(items)) => items.into_iter().next().unwrap_or(Value::Null),
        Ok(other) => other,
        Err(_) => Value::Null,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn has_data(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.contains_key("data"))
}
