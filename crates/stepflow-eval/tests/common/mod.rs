//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use stepflow_eval::{async_trait, ApiCallError, ApiClient, Bindings, BufferSink, Interpreter, Value};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Build a bindings map from `(name, value)` pairs.
pub fn args<const N: usize>(pairs: [(&str, Value); N]) -> Bindings {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Interpreter that captures printed output in the returned buffer.
pub fn capturing_interpreter() -> (Interpreter, BufferSink) {
    init_tracing();
    let sink = BufferSink::new();
    (Interpreter::new().with_output(sink.clone()), sink)
}

/// API client that records every config it receives.
///
/// Responds with the config's `"reply"` field when it is a string, and fails
/// when the config carries `"fail": true`.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<serde_json::Value>>,
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<serde_json::Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiClient for RecordingClient {
    async fn call(&self, config: &serde_json::Value) -> Result<Value, ApiCallError> {
        self.calls.lock().unwrap().push(config.clone());
        if config["fail"] == serde_json::Value::Bool(true) {
            return Err("upstream returned 503".into());
        }
        let reply = config["reply"].as_str().unwrap_or("ok");
        Ok(Value::from(reply))
    }

    fn name(&self) -> &str {
        "RecordingClient"
    }
}
