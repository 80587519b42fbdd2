use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";
pub const DEFAULT_METHOD_ARN: &str = "*";
pub const DEFAULT_PRINCIPAL: &str = "user";
pub const ARCHIVE_SUCCESS_MESSAGE: &str = "Order processed successfully";

/// TOKEN-type request forwarded by API Gateway to a Lambda authorizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenAuthorizerEvent {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(rename = "authorizationToken", default)]
    pub authorization_token: String,
    #[serde(rename = "methodArn", default = "default_method_arn")]
    pub method_arn: String,
}

fn default_method_arn() -> String {
    DEFAULT_METHOD_ARN.to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

/// Access decision returned to the gateway. `context` is forwarded to the
/// downstream integration as `requestContext.authorizer`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizerResponse {
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "policyDocument")]
    pub policy_document: PolicyDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

pub fn generate_policy(
    principal_id: impl Into<String>,
    effect: Effect,
    resource: impl Into<String>,
    context: Option<BTreeMap<String, String>>,
) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: principal_id.into(),
        policy_document: PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                action: INVOKE_ACTION.to_string(),
                effect,
                resource: resource.into(),
            }],
        },
        context: context.filter(|values| !values.is_empty()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedOrder {
    pub status: String,
    pub power: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorResult {
    pub results: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<GeneratedOrder>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchiveResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    pub order: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
    #[serde(rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestionSummary {
    pub message: String,
    pub count: usize,
}

impl IngestionSummary {
    pub fn saved(count: usize) -> Self {
        Self {
            message: format!("Successfully saved {count} orders"),
            count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

pub fn json_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: stable_contract_json(payload),
        is_base64_encoded: false,
    }
}

pub fn error_response(status_code: u16, message: impl Into<String>) -> ApiGatewayResponse {
    json_response(
        status_code,
        ErrorBody {
            error_message: message.into(),
        },
    )
}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}
