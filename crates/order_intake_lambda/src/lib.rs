//! AWS-oriented adapters and handlers for the order-intake functions.
//!
//! This crate owns runtime integration details (Lambda handlers, collaborator
//! adapters, environment configuration, structured logging). Domain contracts
//! and validation live in `order_intake_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
