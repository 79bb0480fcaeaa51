//! Sink for the client's failure messages.
//!
//! Every failure the client swallows is reported as one plain-string message.

use std::fmt;

/// Receives one message per failed call.
pub trait FailureLog: Send + Sync + fmt::Debug {
    /// Records a failure message.
    fn record(&self, message: &str);
}

/// Default sink: emits each message as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingFailureLog;

impl FailureLog for TracingFailureLog {
    fn record(&self, message: &str) {
        tracing::warn!(target: "commerce_graph", "{message}");
    }
}
