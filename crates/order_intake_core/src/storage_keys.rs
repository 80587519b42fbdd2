use chrono::{DateTime, SecondsFormat, Utc};

pub const ORDER_KEY_PREFIX: &str = "orders";
pub const ORDER_OBJECT_SUFFIX: &str = ".json";

pub fn order_object_key(base_prefix: &str, written_at: DateTime<Utc>) -> String {
    let trimmed = base_prefix.trim_matches('/');
    let timestamp = written_at.to_rfc3339_opts(SecondsFormat::Micros, false);
    if trimmed.is_empty() {
        format!("order_{timestamp}{ORDER_OBJECT_SUFFIX}")
    } else {
        format!("{trimmed}/order_{timestamp}{ORDER_OBJECT_SUFFIX}")
    }
}
