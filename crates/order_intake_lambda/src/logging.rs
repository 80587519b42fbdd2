use serde_json::{json, Value};

/// Builds the structured event body shared by every handler log line.
pub fn structured_event(component: &str, level: &str, event: &str, details: Value) -> Value {
    json!({
        "component": component,
        "level": level,
        "event": event,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "details": details,
    })
}

pub fn log_info(component: &str, event: &str, details: Value) {
    tracing::info!("{}", structured_event(component, "info", event, details));
}

pub fn log_warn(component: &str, event: &str, details: Value) {
    tracing::warn!("{}", structured_event(component, "warn", event, details));
}

pub fn log_error(component: &str, event: &str, details: Value) {
    tracing::error!("{}", structured_event(component, "error", event, details));
}
