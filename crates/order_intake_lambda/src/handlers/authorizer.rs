use std::collections::BTreeMap;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use order_intake_core::contract::{
    generate_policy, AuthorizerResponse, Effect, TokenAuthorizerEvent, DEFAULT_PRINCIPAL,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::adapters::secrets::{SecretCache, SecretProvider};
use crate::logging::{log_info, log_warn};

const COMPONENT: &str = "authorizer";
const BEARER_PREFIX: &str = "bearer ";

pub type Claims = Map<String, Value>;

/// The only failure the gateway ever sees. Distinct causes stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizerError {
    #[error("Unauthorized")]
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("Malformed authorizer event: {0}")]
    MalformedEvent(String),
    #[error("No authorization token provided")]
    MissingToken,
    #[error("Signing secret unavailable: {0}")]
    SecretUnavailable(String),
    #[error("Token expired")]
    ExpiredToken,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl AuthFailure {
    fn code(&self) -> &'static str {
        match self {
            Self::MalformedEvent(_) => "malformed_event",
            Self::MissingToken => "missing_token",
            Self::SecretUnavailable(_) => "secret_unavailable",
            Self::ExpiredToken => "expired_token",
            Self::InvalidToken(_) => "invalid_token",
        }
    }
}

pub fn handle_authorizer_event(
    event: Value,
    secrets: &SecretCache,
    provider: &dyn SecretProvider,
) -> Result<AuthorizerResponse, AuthorizerError> {
    match authorize(event, secrets, provider) {
        Ok(response) => {
            log_info(
                COMPONENT,
                "access_allowed",
                json!({
                    "principal_id": response.principal_id.clone(),
                }),
            );
            Ok(response)
        }
        Err(failure) => {
            log_warn(
                COMPONENT,
                "access_denied",
                json!({
                    "reason": failure.code(),
                    "error": failure.to_string(),
                }),
            );
            Err(AuthorizerError::Unauthorized)
        }
    }
}

fn authorize(
    event: Value,
    secrets: &SecretCache,
    provider: &dyn SecretProvider,
) -> Result<AuthorizerResponse, AuthFailure> {
    let event: TokenAuthorizerEvent = serde_json::from_value(event)
        .map_err(|error| AuthFailure::MalformedEvent(error.to_string()))?;

    if event.authorization_token.is_empty() {
        return Err(AuthFailure::MissingToken);
    }

    let token = strip_bearer_prefix(&event.authorization_token);
    let secret = secrets
        .get_or_fetch(provider)
        .map_err(AuthFailure::SecretUnavailable)?;
    let claims = validate_token(token, secret)?;

    let principal_id = principal_from_claims(&claims);
    let context = BTreeMap::from([
        ("userId".to_string(), principal_id.clone()),
        (
            "email".to_string(),
            claim_text(&claims, "email").unwrap_or_default(),
        ),
    ]);

    Ok(generate_policy(
        principal_id,
        Effect::Allow,
        event.method_arn,
        Some(context),
    ))
}

pub fn strip_bearer_prefix(raw: &str) -> &str {
    match raw.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => &raw[BEARER_PREFIX.len()..],
        _ => raw,
    }
}

/// Verifies an HS256 token against the shared secret.
///
/// The signature is always checked; `exp` and `nbf` only when present. No
/// claim is mandatory and no leeway is granted on either bound.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthFailure> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_nbf = true;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => AuthFailure::ExpiredToken,
            _ => AuthFailure::InvalidToken(error.to_string()),
        })
}

pub fn principal_from_claims(claims: &Claims) -> String {
    claim_text(claims, "sub")
        .or_else(|| claim_text(claims, "email"))
        .unwrap_or_else(|| DEFAULT_PRINCIPAL.to_string())
}

fn claim_text(claims: &Claims, name: &str) -> Option<String> {
    match claims.get(name)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    const SECRET: &str = "test-secret-key";
    const METHOD_ARN: &str = "arn:aws:execute-api:eu-west-1:123456789:api/dev/POST/orders";

    struct StaticProvider {
        secret: Option<&'static str>,
        calls: Mutex<usize>,
    }

    impl StaticProvider {
        fn new(secret: Option<&'static str>) -> Self {
            Self {
                secret,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().expect("poisoned mutex")
        }
    }

    impl SecretProvider for StaticProvider {
        fn get_secret(&self, _secret_name: &str) -> Result<String, String> {
            *self.calls.lock().expect("poisoned mutex") += 1;
            self.secret
                .map(str::to_string)
                .ok_or_else(|| "ResourceNotFoundException".to_string())
        }
    }

    fn mint(claims: Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token should encode")
    }

    fn token_event(authorization_token: &str) -> Value {
        json!({
            "type": "TOKEN",
            "authorizationToken": authorization_token,
            "methodArn": METHOD_ARN,
        })
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn run(event: Value, provider: &StaticProvider) -> Result<AuthorizerResponse, AuthorizerError> {
        handle_authorizer_event(event, &SecretCache::new("jwt-secret"), provider)
    }

    #[test]
    fn valid_bearer_token_allows_access() {
        let provider = StaticProvider::new(Some(SECRET));
        let token = mint(json!({"sub": "user123", "email": "test@example.com"}), SECRET);

        let response = run(token_event(&format!("Bearer {token}")), &provider)
            .expect("token should be accepted");

        assert_eq!(response.principal_id, "user123");
        assert_eq!(response.policy_document.statement[0].effect, Effect::Allow);
        assert_eq!(response.policy_document.statement[0].resource, METHOD_ARN);
        assert_eq!(
            response.context,
            Some(BTreeMap::from([
                ("userId".to_string(), "user123".to_string()),
                ("email".to_string(), "test@example.com".to_string()),
            ]))
        );
    }

    #[test]
    fn token_without_bearer_prefix_is_accepted() {
        let provider = StaticProvider::new(Some(SECRET));
        let token = mint(json!({"sub": "user123"}), SECRET);

        let response = run(token_event(&token), &provider).expect("token should be accepted");
        assert_eq!(response.principal_id, "user123");
    }

    #[test]
    fn bearer_prefix_is_case_insensitive() {
        assert_eq!(strip_bearer_prefix("BEARER abc"), "abc");
        assert_eq!(strip_bearer_prefix("bearer abc"), "abc");
        assert_eq!(strip_bearer_prefix("Bearerabc"), "Bearerabc");
        assert_eq!(strip_bearer_prefix("abc"), "abc");
    }

    #[test]
    fn principal_falls_back_to_email_then_default() {
        let provider = StaticProvider::new(Some(SECRET));

        let email_only = mint(json!({"email": "test@example.com"}), SECRET);
        let response = run(token_event(&email_only), &provider).expect("token should be accepted");
        assert_eq!(response.principal_id, "test@example.com");

        let anonymous = mint(json!({"role": "ingest"}), SECRET);
        let response = run(token_event(&anonymous), &provider).expect("token should be accepted");
        assert_eq!(response.principal_id, "user");
        assert_eq!(
            response.context.expect("context should be present")["email"],
            ""
        );
    }

    #[test]
    fn unexpired_token_is_accepted() {
        let provider = StaticProvider::new(Some(SECRET));
        let token = mint(json!({"sub": "user123", "exp": now() + 3600}), SECRET);

        assert!(run(token_event(&token), &provider).is_ok());
    }

    #[test]
    fn token_not_yet_valid_is_rejected() {
        let provider = StaticProvider::new(Some(SECRET));
        let premature = mint(json!({"sub": "user123", "nbf": now() + 3600}), SECRET);
        let matured = mint(json!({"sub": "user123", "nbf": now() - 60}), SECRET);

        assert_eq!(
            run(token_event(&premature), &provider),
            Err(AuthorizerError::Unauthorized)
        );
        assert!(matches!(
            validate_token(&premature, SECRET),
            Err(AuthFailure::InvalidToken(_))
        ));
        assert!(run(token_event(&matured), &provider).is_ok());
    }

    #[test]
    fn every_failure_cause_collapses_to_unauthorized() {
        let healthy = StaticProvider::new(Some(SECRET));
        let expired = mint(json!({"sub": "user123", "exp": now() - 3600}), SECRET);
        let wrong_key = mint(json!({"sub": "user123"}), "another-secret");

        let events = [
            token_event(""),
            token_event(&format!("Bearer {expired}")),
            token_event("Bearer invalid.token.here"),
            token_event(&wrong_key),
            token_event("Bearer "),
            json!("not an event"),
        ];

        for event in events {
            assert_eq!(run(event, &healthy), Err(AuthorizerError::Unauthorized));
        }
    }

    #[test]
    fn secret_failure_is_reported_as_unauthorized() {
        let provider = StaticProvider::new(None);
        let token = mint(json!({"sub": "user123"}), SECRET);

        let error = run(token_event(&token), &provider).expect_err("secret failure should deny");
        assert_eq!(error.to_string(), "Unauthorized");
    }

    #[test]
    fn missing_token_skips_secret_lookup() {
        let provider = StaticProvider::new(Some(SECRET));

        assert!(run(token_event(""), &provider).is_err());
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn secret_is_fetched_once_across_invocations() {
        let provider = StaticProvider::new(Some(SECRET));
        let cache = SecretCache::new("jwt-secret");
        let token = mint(json!({"sub": "user123"}), SECRET);

        for _ in 0..3 {
            handle_authorizer_event(token_event(&token), &cache, &provider)
                .expect("token should be accepted");
        }
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn classifies_expired_and_invalid_tokens() {
        let expired = mint(json!({"exp": now() - 60}), SECRET);

        assert_eq!(
            validate_token(&expired, SECRET),
            Err(AuthFailure::ExpiredToken)
        );
        assert!(matches!(
            validate_token("invalid.token.here", SECRET),
            Err(AuthFailure::InvalidToken(_))
        ));
    }
}
