use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;

pub const SERVICE_NAME: &str = "interview-backend";

/// JSON-line logger handed to the components that need it.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    service: String,
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, event_type: &str, context: HashMap<String, Value>) -> Value {
        let mut log_entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event_type": event_type,
            "service": self.service,
        });

        for (key, value) in context {
            log_entry[key] = value;
        }

        log_entry
    }

    pub fn log_request(&self, method: &str, path: &str, user_id: Option<i32>, status: u16) {
        let log_entry = self.entry(
            "http_request",
            HashMap::from([
                ("method".to_string(), json!(method)),
                ("path".to_string(), json!(path)),
                ("user_id".to_string(), json!(user_id)),
                ("status_code".to_string(), json!(status)),
            ]),
        );

        info!("{}", log_entry);
    }

    pub fn log_note(&self, note: &str, context: HashMap<String, Value>) {
        let mut log_entry = self.entry("note", context);
        log_entry["note"] = json!(note);

        info!("{}", log_entry);
    }

    pub fn log_business_event(
        &self,
        event_name: &str,
        user_id: Option<i32>,
        metadata: HashMap<String, Value>,
    ) {
        let mut log_entry = self.entry("business_event", metadata);
        log_entry["event_name"] = json!(event_name);
        log_entry["user_id"] = json!(user_id);

        info!("{}", log_entry);
    }
}
