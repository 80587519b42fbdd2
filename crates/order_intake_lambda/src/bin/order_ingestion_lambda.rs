use std::collections::HashMap;

use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemOutput;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_intake_core::contract::ApiGatewayResponse;
use order_intake_core::document::{DocumentValue, OrderItem};
use order_intake_core::ingestion::batch_chunks;
use order_intake_lambda::adapters::item_store::OrderItemStore;
use order_intake_lambda::config::IngestionSettings;
use order_intake_lambda::handlers::ingestion::handle_ingestion_event;
use serde_json::Value;

struct DynamoDbOrderStore {
    table_name: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl OrderItemStore for DynamoDbOrderStore {
    fn batch_put(&self, items: &[OrderItem]) -> Result<(), String> {
        for requests in batch_write_requests(items)? {
            let client = self.dynamodb_client.clone();
            let table_name = self.table_name.clone();

            let output = tokio::task::block_in_place(|| {
                tokio::runtime::Handle::current().block_on(async move {
                    client
                        .batch_write_item()
                        .request_items(table_name, requests)
                        .send()
                        .await
                        .map_err(|error| format!("failed to batch write orders: {error}"))
                })
            })?;

            ensure_processed(&output)?;
        }

        Ok(())
    }
}

/// One `BatchWriteItem` request body per chunk of at most 25 items.
fn batch_write_requests(items: &[OrderItem]) -> Result<Vec<Vec<WriteRequest>>, String> {
    batch_chunks(items)
        .map(|chunk| chunk.iter().map(to_write_request).collect::<Result<Vec<_>, _>>())
        .collect()
}

fn unprocessed_count(output: &BatchWriteItemOutput) -> usize {
    output
        .unprocessed_items()
        .map(|pending| pending.values().map(Vec::len).sum())
        .unwrap_or(0)
}

// Unprocessed items are not retried; the invocation fails instead.
fn ensure_processed(output: &BatchWriteItemOutput) -> Result<(), String> {
    match unprocessed_count(output) {
        0 => Ok(()),
        unprocessed => Err(format!("batch write left {unprocessed} orders unprocessed")),
    }
}

fn to_write_request(item: &OrderItem) -> Result<WriteRequest, String> {
    let put_request = PutRequest::builder()
        .set_item(Some(to_attribute_map(item)))
        .build()
        .map_err(|error| format!("invalid put request: {error}"))?;
    Ok(WriteRequest::builder().put_request(put_request).build())
}

fn to_attribute_map(item: &OrderItem) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(key, value)| (key.clone(), to_attribute_value(value)))
        .collect()
}

fn to_attribute_value(value: &DocumentValue) -> AttributeValue {
    match value {
        DocumentValue::Null => AttributeValue::Null(true),
        DocumentValue::Bool(flag) => AttributeValue::Bool(*flag),
        DocumentValue::Integer(number) => AttributeValue::N(number.to_string()),
        DocumentValue::Float(number) => AttributeValue::N(number.to_string()),
        DocumentValue::Decimal(number) => AttributeValue::N(number.to_string()),
        DocumentValue::Text(text) => AttributeValue::S(text.clone()),
        DocumentValue::List(values) => {
            AttributeValue::L(values.iter().map(to_attribute_value).collect())
        }
        DocumentValue::Map(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), to_attribute_value(value)))
                .collect(),
        ),
    }
}

async fn handle_request(
    event: LambdaEvent<Value>,
    store: &DynamoDbOrderStore,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_ingestion_event(&event.payload, Utc::now(), store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let settings = IngestionSettings::from_env()?;
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(settings.region.clone()))
        .load()
        .await;
    let store = DynamoDbOrderStore {
        table_name: settings.table_name,
        dynamodb_client: aws_sdk_dynamodb::Client::new(&aws_config),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &store))).await
}
