//! Shared order-intake domain primitives.
//!
//! This crate owns request/response contracts, batch validation, and the
//! document value tree persisted by the ingestion API. It intentionally
//! excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod document;
pub mod ingestion;
pub mod storage_keys;
