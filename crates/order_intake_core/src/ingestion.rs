use serde_json::Value;
use thiserror::Error;

use crate::document::{
    convert_floats_to_decimal, parse_document, DecimalConversionError, DocumentValue, OrderItem,
};

pub const RECORD_ID_FIELD: &str = "record_id";
pub const TTL_FIELD: &str = "ttl";
pub const CREATED_AT_FIELD: &str = "created_at";
pub const TTL_SECONDS: i64 = 24 * 60 * 60;
/// Per-request item limit of DynamoDB `BatchWriteItem`.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Client input problems, each mapped to a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionRejection {
    #[error("Request body is empty")]
    EmptyBody,
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Request body must be a list of orders")]
    NotAList,
    #[error("Each order must have a 'record_id' field")]
    MissingRecordId,
}

/// Runs the request body through the validation gates in order.
///
/// The whole batch is checked before anything is returned, so a single
/// record without `record_id` rejects every record. A text body is parsed
/// from its literal text so wide integers keep every digit.
pub fn parse_order_batch(body: Option<&Value>) -> Result<Vec<OrderItem>, IngestionRejection> {
    let parsed = match body {
        None | Some(Value::Null) => return Err(IngestionRejection::EmptyBody),
        Some(Value::String(text)) => parse_document(text)
            .map_err(|error| IngestionRejection::InvalidJson(error.to_string()))?,
        Some(other) => DocumentValue::from(other.clone()),
    };

    let DocumentValue::List(records) = parsed else {
        return Err(IngestionRejection::NotAList);
    };

    records
        .into_iter()
        .map(|record| match record {
            DocumentValue::Map(fields) if fields.contains_key(RECORD_ID_FIELD) => Ok(fields),
            _ => Err(IngestionRejection::MissingRecordId),
        })
        .collect()
}

/// Stamps each record with `ttl` and `created_at` and rewrites float leaves
/// as exact decimals.
pub fn build_order_items(
    orders: Vec<OrderItem>,
    now_epoch_seconds: i64,
) -> Result<Vec<OrderItem>, DecimalConversionError> {
    let ttl = now_epoch_seconds + TTL_SECONDS;

    orders
        .into_iter()
        .map(|mut item| {
            item.insert(TTL_FIELD.to_string(), DocumentValue::Integer(i128::from(ttl)));
            item.insert(
                CREATED_AT_FIELD.to_string(),
                DocumentValue::Integer(i128::from(now_epoch_seconds)),
            );

            item.into_iter()
                .map(|(key, value)| convert_floats_to_decimal(value).map(|value| (key, value)))
                .collect::<Result<OrderItem, _>>()
        })
        .collect()
}

pub fn batch_chunks<T>(items: &[T]) -> std::slice::Chunks<'_, T> {
    items.chunks(MAX_BATCH_WRITE_ITEMS)
}
