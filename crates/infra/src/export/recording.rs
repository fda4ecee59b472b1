//! Recording exporters/sinks for tests/dev.

use std::sync::Mutex;

use serde_json::Value as JsonValue;

use super::sink::{ExportSink, TransportStatus};
use super::{ExportAction, ExportError, Exporter};

/// Keeps every action it is asked to execute, in order.
///
/// Optionally fails (with a 500 status error) on the first action whose
/// name matches `fail_on`, after recording it.
#[derive(Debug, Default)]
pub struct RecordingExporter {
    actions: Mutex<Vec<ExportAction>>,
    fail_on: Option<&'static str>,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(action_name: &'static str) -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            fail_on: Some(action_name),
        }
    }

    pub fn actions(&self) -> Vec<ExportAction> {
        self.actions.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions().iter().map(ExportAction::name).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut a) = self.actions.lock() {
            a.clear();
        }
    }
}

impl Exporter for RecordingExporter {
    fn execute(&self, action: ExportAction) -> Result<(), ExportError> {
        let name = action.name();
        if let Ok(mut a) = self.actions.lock() {
            a.push(action);
        }
        if self.fail_on == Some(name) {
            return Err(ExportError::Status {
                status: 500,
                url: format!("recording://{name}"),
            });
        }
        Ok(())
    }
}

/// One call made against a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Post { url: String, payload: JsonValue },
    Delete { url: String, ids: Vec<String> },
}

/// Sink that answers every call with a fixed status and keeps the calls.
#[derive(Debug)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    status: TransportStatus,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_status(TransportStatus::OK)
    }

    pub fn with_status(status: TransportStatus) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status,
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: SinkCall) -> TransportStatus {
        if let Ok(mut c) = self.calls.lock() {
            c.push(call);
        }
        self.status
    }
}

impl ExportSink for RecordingSink {
    fn post(&self, payload: &JsonValue, url: &str) -> Result<TransportStatus, ExportError> {
        Ok(self.record(SinkCall::Post {
            url: url.to_string(),
            payload: payload.clone(),
        }))
    }

    fn delete(&self, ids: &[String], url: &str) -> Result<TransportStatus, ExportError> {
        Ok(self.record(SinkCall::Delete {
            url: url.to_string(),
            ids: ids.to_vec(),
        }))
    }
}
