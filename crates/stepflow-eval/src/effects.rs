//! Capabilities the evaluator calls out to.
//!
//! The evaluator has no transport or console of its own. API-call
//! expressions go through an [`ApiClient`] and `Print` statements through an
//! [`OutputSink`], both supplied when the [`Interpreter`](crate::Interpreter)
//! is built.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::ApiCallError;
use crate::value::Value;

/// Performs the external call behind an API-call expression.
///
/// The evaluator never inspects `config`; its shape is a contract between
/// workflow authors and the client implementation.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Perform the call described by `config` and return its response.
    async fn call(&self, config: &serde_json::Value) -> Result<Value, ApiCallError>;

    /// Returns a name for this client (used in logging).
    fn name(&self) -> &str {
        "ApiClient"
    }
}

#[async_trait]
impl<T: ApiClient + ?Sized> ApiClient for Arc<T> {
    async fn call(&self, config: &serde_json::Value) -> Result<Value, ApiCallError> {
        (**self).call(config).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Client used when none is configured: every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredApiClient;

#[async_trait]
impl ApiClient for UnconfiguredApiClient {
    async fn call(&self, _config: &serde_json::Value) -> Result<Value, ApiCallError> {
        Err("no API client configured".into())
    }

    fn name(&self) -> &str {
        "UnconfiguredApiClient"
    }
}

/// Receives values emitted by `Print` statements.
pub trait OutputSink: Send + Sync {
    /// Deliver one printed value.
    fn emit(&self, value: &Value);
}

impl<T: OutputSink + ?Sized> OutputSink for Arc<T> {
    fn emit(&self, value: &Value) {
        (**self).emit(value)
    }
}

/// Writes each value on its own line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&self, value: &Value) {
        println!("{value}");
    }
}

/// Logs each value through `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn emit(&self, value: &Value) {
        tracing::info!(target: "stepflow::print", %value);
    }
}

/// Discards all output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl OutputSink for SilentSink {
    fn emit(&self, _value: &Value) {}
}

/// Captures emitted values in memory.
///
/// Clones share one buffer, so a caller can keep a handle while the
/// interpreter owns another.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    values: Arc<Mutex<Vec<Value>>>,
}

impl BufferSink {
    /// Create a sink with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All values emitted so far, oldest first.
    pub fn values(&self) -> Vec<Value> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Emitted values rendered as lines of text.
    pub fn output(&self) -> String {
        self.values()
            .iter()
            .map(|value| format!("{value}\n"))
            .collect()
    }

    /// Discard everything captured so far.
    pub fn clear(&self) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl OutputSink for BufferSink {
    fn emit(&self, value: &Value) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value.clone());
    }
}
