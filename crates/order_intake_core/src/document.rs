//! Open order documents as persisted by the key-value store.
//!
//! Incoming JSON is lifted into [`DocumentValue`] so numeric leaves can be
//! rewritten without losing the distinction between integers, binary floats,
//! and exact decimals.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::value::RawValue;
use serde_json::Value;
use thiserror::Error;

pub type OrderItem = BTreeMap<String, DocumentValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    Decimal(BigDecimal),
    Text(String),
    List(Vec<DocumentValue>),
    Map(BTreeMap<String, DocumentValue>),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot represent {value} as an exact decimal: {reason}")]
pub struct DecimalConversionError {
    pub value: f64,
    pub reason: String,
}

impl From<Value> for DocumentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => {
                if let Some(signed) = number.as_i64() {
                    Self::Integer(i128::from(signed))
                } else if let Some(unsigned) = number.as_u64() {
                    Self::Integer(i128::from(unsigned))
                } else {
                    // Already parsed: anything wider than u64 arrived as an f64.
                    Self::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(text) => Self::Text(text),
            Value::Array(values) => Self::List(values.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Parses JSON text straight into a document, reading each number from its
/// literal.
///
/// Integer literals stay exact at any width: up to `i128` as
/// [`DocumentValue::Integer`], beyond that as [`DocumentValue::Decimal`].
/// Fractional and exponent literals become [`DocumentValue::Float`] unless
/// they overflow `f64`, in which case the literal is kept as a decimal.
pub fn parse_document(text: &str) -> Result<DocumentValue, serde_json::Error> {
    let raw: &RawValue = serde_json::from_str(text)?;
    lift_raw(raw)
}

fn lift_raw(raw: &RawValue) -> Result<DocumentValue, serde_json::Error> {
    let text = raw.get();
    match text.as_bytes().first().copied() {
        Some(b'{') => serde_json::from_str::<BTreeMap<String, &RawValue>>(text)?
            .into_iter()
            .map(|(key, value)| lift_raw(value).map(|value| (key, value)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(DocumentValue::Map),
        Some(b'[') => serde_json::from_str::<Vec<&RawValue>>(text)?
            .into_iter()
            .map(lift_raw)
            .collect::<Result<Vec<_>, _>>()
            .map(DocumentValue::List),
        Some(b'-' | b'0'..=b'9') => Ok(lift_number(text)),
        _ => serde_json::from_str::<Value>(text).map(DocumentValue::from),
    }
}

fn lift_number(literal: &str) -> DocumentValue {
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    if digits.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(integer) = literal.parse::<i128>() {
            return DocumentValue::Integer(integer);
        }
    } else if let Ok(float) = literal.parse::<f64>() {
        if float.is_finite() {
            return DocumentValue::Float(float);
        }
    }

    match BigDecimal::from_str(literal) {
        Ok(decimal) => DocumentValue::Decimal(decimal),
        Err(_) => DocumentValue::Float(f64::NAN),
    }
}

/// Rewrites every binary float leaf as an exact decimal.
///
/// The decimal is parsed from the float's shortest round-trip text form, so
/// `50.25` is stored as `50.25` rather than the nearest binary fraction.
/// Already-decimal, integer, and text leaves pass through unchanged, which
/// makes the conversion idempotent.
pub fn convert_floats_to_decimal(
    value: DocumentValue,
) -> Result<DocumentValue, DecimalConversionError> {
    match value {
        DocumentValue::Float(float) => float_to_decimal(float).map(DocumentValue::Decimal),
        DocumentValue::List(values) => values
            .into_iter()
            .map(convert_floats_to_decimal)
            .collect::<Result<Vec<_>, _>>()
            .map(DocumentValue::List),
        DocumentValue::Map(entries) => entries
            .into_iter()
            .map(|(key, value)| convert_floats_to_decimal(value).map(|value| (key, value)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(DocumentValue::Map),
        other => Ok(other),
    }
}

// f64's Display is the shortest round-trip digits in positional notation.
fn float_to_decimal(value: f64) -> Result<BigDecimal, DecimalConversionError> {
    if !value.is_finite() {
        return Err(DecimalConversionError {
            value,
            reason: "value is not finite".to_string(),
        });
    }

    BigDecimal::from_str(&value.to_string()).map_err(|error| DecimalConversionError {
        value,
        reason: error.to_string(),
    })
}
