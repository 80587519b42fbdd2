use chrono::{DateTime, Utc};
use order_intake_core::contract::{
    error_response, json_response, ApiGatewayResponse, IngestionSummary,
};
use order_intake_core::ingestion::{build_order_items, parse_order_batch};
use serde_json::{json, Value};

use crate::adapters::item_store::OrderItemStore;
use crate::logging::{log_error, log_info, log_warn};

const COMPONENT: &str = "order_ingestion";

/// Validates and persists a batch of orders posted through API Gateway.
///
/// Client input problems map to 400; anything else that goes wrong after
/// validation maps to 500 with the underlying description.
pub fn handle_ingestion_event(
    event: &Value,
    now: DateTime<Utc>,
    store: &impl OrderItemStore,
) -> ApiGatewayResponse {
    log_info(
        COMPONENT,
        "request_received",
        json!({
            "http_method": event.get("httpMethod").cloned().unwrap_or(Value::Null),
            "path": event.get("path").cloned().unwrap_or(Value::Null),
        }),
    );

    let orders = match parse_order_batch(event.get("body")) {
        Ok(value) => value,
        Err(rejection) => {
            log_warn(
                COMPONENT,
                "request_rejected",
                json!({ "error": rejection.to_string() }),
            );
            return error_response(400, rejection.to_string());
        }
    };

    let count = orders.len();
    let items = match build_order_items(orders, now.timestamp()) {
        Ok(value) => value,
        Err(error) => return internal_error(&error.to_string()),
    };

    if let Err(error) = store.batch_put(&items) {
        return internal_error(&error);
    }

    log_info(COMPONENT, "orders_saved", json!({ "count": count }));
    json_response(201, IngestionSummary::saved(count))
}

fn internal_error(detail: &str) -> ApiGatewayResponse {
    log_error(COMPONENT, "orders_save_failed", json!({ "error": detail }));
    error_response(500, format!("Internal server error: {detail}"))
}
