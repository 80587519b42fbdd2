//! Environment configuration, read once per cold start by each binary.

use order_intake_core::storage_keys::ORDER_KEY_PREFIX;
use thiserror::Error;

pub const JWT_SECRET_NAME_VAR: &str = "JWT_SECRET_NAME";
pub const LOG_BUCKET_VAR: &str = "LOG_BUCKET";
pub const ORDER_KEY_PREFIX_VAR: &str = "ORDER_KEY_PREFIX";
pub const TABLE_NAME_VAR: &str = "TABLE_NAME";
pub const AWS_REGION_VAR: &str = "AWS_REGION";
pub const DEFAULT_REGION: &str = "eu-west-1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizerSettings {
    pub secret_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiverSettings {
    pub bucket: String,
    pub key_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSettings {
    pub table_name: String,
    pub region: String,
}

impl AuthorizerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            secret_name: required(&lookup, JWT_SECRET_NAME_VAR)?,
        })
    }
}

impl ArchiverSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: required(&lookup, LOG_BUCKET_VAR)?,
            key_prefix: lookup(ORDER_KEY_PREFIX_VAR)
                .unwrap_or_else(|| ORDER_KEY_PREFIX.to_string()),
        })
    }
}

impl IngestionSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            table_name: required(&lookup, TABLE_NAME_VAR)?,
            region: lookup(AWS_REGION_VAR)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| values.get(name).cloned()
    }

    #[test]
    fn authorizer_requires_secret_name() {
        let error = AuthorizerSettings::from_lookup(lookup_from(&[]))
            .expect_err("missing secret name should fail");
        assert_eq!(error.to_string(), "JWT_SECRET_NAME must be configured");

        let blank = AuthorizerSettings::from_lookup(lookup_from(&[(JWT_SECRET_NAME_VAR, "  ")]));
        assert_eq!(blank, Err(ConfigError::Missing(JWT_SECRET_NAME_VAR)));
    }

    #[test]
    fn archiver_defaults_key_prefix() {
        let settings =
            ArchiverSettings::from_lookup(lookup_from(&[(LOG_BUCKET_VAR, "order-logs")]))
                .expect("settings should load");

        assert_eq!(settings.bucket, "order-logs");
        assert_eq!(settings.key_prefix, "orders");
    }

    #[test]
    fn archiver_requires_bucket() {
        let error = ArchiverSettings::from_lookup(lookup_from(&[(ORDER_KEY_PREFIX_VAR, "x")]))
            .expect_err("missing bucket should fail");
        assert_eq!(error, ConfigError::Missing(LOG_BUCKET_VAR));
    }

    #[test]
    fn ingestion_falls_back_to_default_region() {
        let settings =
            IngestionSettings::from_lookup(lookup_from(&[(TABLE_NAME_VAR, "orders")]))
                .expect("settings should load");
        assert_eq!(settings.region, DEFAULT_REGION);

        let regional = IngestionSettings::from_lookup(lookup_from(&[
            (TABLE_NAME_VAR, "orders"),
            (AWS_REGION_VAR, "us-east-1"),
        ]))
        .expect("settings should load");
        assert_eq!(regional.region, "us-east-1");
    }
}
