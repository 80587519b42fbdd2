use chrono::{DateTime, Utc};
use order_intake_core::contract::{ArchiveResponse, ARCHIVE_SUCCESS_MESSAGE};
use order_intake_core::storage_keys::order_object_key;
use serde_json::{json, Value};
use thiserror::Error;

use crate::adapters::object_store::{ObjectEncryption, ObjectStore, ObjectWrite, JSON_CONTENT_TYPE};
use crate::logging::{log_error, log_info};

const COMPONENT: &str = "order_archiver";
const REJECTED_STATUS: &str = "rejected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiverConfig {
    pub bucket: String,
    pub key_prefix: String,
    pub written_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("Order status is rejected")]
    Rejected,
    #[error("Order is missing a status field")]
    MissingStatus,
    #[error("Failed to serialize order: {0}")]
    Serialization(String),
    #[error("{0}")]
    Storage(String),
}

pub fn handle_archive_event(
    order: Value,
    config: &ArchiverConfig,
    store: &impl ObjectStore,
) -> Result<ArchiveResponse, ArchiveError> {
    log_info(COMPONENT, "order_received", json!({ "order": order.clone() }));

    match order.get("status") {
        None => return Err(ArchiveError::MissingStatus),
        Some(Value::String(status)) if status == REJECTED_STATUS => {
            return Err(ArchiveError::Rejected);
        }
        Some(_) => {}
    }

    let body = serde_json::to_vec_pretty(&order)
        .map_err(|error| ArchiveError::Serialization(error.to_string()))?;
    let key = order_object_key(&config.key_prefix, config.written_at);

    store
        .put_object(&ObjectWrite {
            key: key.clone(),
            body,
            content_type: JSON_CONTENT_TYPE.to_string(),
            encryption: ObjectEncryption::Aes256,
        })
        .map_err(|error| {
            log_error(
                COMPONENT,
                "order_write_failed",
                json!({
                    "bucket": config.bucket.clone(),
                    "key": key.clone(),
                    "error": error.clone(),
                }),
            );
            ArchiveError::Storage(error)
        })?;

    log_info(
        COMPONENT,
        "order_archived",
        json!({
            "location": format!("s3://{}/{key}", config.bucket),
        }),
    );

    Ok(ArchiveResponse {
        status_code: 200,
        message: ARCHIVE_SUCCESS_MESSAGE.to_string(),
        order,
    })
}
