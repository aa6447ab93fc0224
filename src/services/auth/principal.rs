/*
 * Responsibility
 * - Types that cross the identity-service boundary (BearerToken, Principal)
 * - ValidationOutcome: the result of one remote check, with the failure reason kept for logs
 */
use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Credential taken from `Authorization: Bearer <token>`.
///
/// Debug output is redacted; the raw value is only reachable through `as_str()`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Parses a raw `Authorization` header value.
    ///
    /// Returns `None` when the scheme marker is missing or nothing follows it.
    pub fn from_header_value(value: &str) -> Option<Self> {
        let token = value.strip_prefix(BEARER_PREFIX)?;
        if token.is_empty() {
            return None;
        }
        Some(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Identity asserted by the remote identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Body of `GET /api/auth/validate`.
#[derive(Debug, Deserialize)]
pub(crate) struct ValidationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Principal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("identity service unreachable: {0}")]
    Transport(String),
    #[error("identity service timed out")]
    Timeout,
    #[error("identity service answered {0}")]
    Status(StatusCode),
    #[error("malformed validation response: {0}")]
    MalformedBody(String),
    #[error("token rejected: {0}")]
    Rejected(String),
    #[error("validation succeeded without a principal")]
    MissingPrincipal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(Principal),
    Invalid(InvalidReason),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn into_principal(self) -> Option<Principal> {
        match self {
            Self::Valid(principal) => Some(principal),
            Self::Invalid(_) => None,
        }
    }
}

impl From<ValidationResponse> for ValidationOutcome {
    fn from(body: ValidationResponse) -> Self {
        if !body.success {
            let message = body.message.unwrap_or_else(|| "no message".to_string());
            return Self::Invalid(InvalidReason::Rejected(message));
        }

        match body.data {
            Some(principal) => Self::Valid(principal),
            None => Self::Invalid(InvalidReason::MissingPrincipal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bearer_token_requires_scheme_marker() {
        assert!(BearerToken::from_header_value("Basic dXNlcjpwYXNz").is_none());
        assert!(BearerToken::from_header_value("bearer abc").is_none());
        assert!(BearerToken::from_header_value("Bearer ").is_none());

        let token = BearerToken::from_header_value("Bearer valid-abc").unwrap();
        assert_eq!(token.as_str(), "valid-abc");
    }

    #[test]
    fn bearer_token_debug_is_redacted() {
        let token = BearerToken::from_header_value("Bearer secret-value").unwrap();
        let printed = format!("{token:?}");
        assert!(!printed.contains("secret-value"));
    }

    #[test]
    fn success_body_yields_principal() {
        let body: ValidationResponse = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "data": {
                "id": 7,
                "username": "alice",
                "email": "alice@example.com",
                "firstName": "Alice",
                "lastName": "Liddell",
                "roles": ["ADMIN"]
            }
        }))
        .unwrap();

        let principal = ValidationOutcome::from(body).into_principal().unwrap();
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.first_name.as_deref(), Some("Alice"));
        assert_eq!(principal.permissions, None);
    }

    #[test]
    fn failure_flag_and_missing_data_are_invalid() {
        let rejected: ValidationResponse =
            serde_json::from_value(json!({ "success": false, "message": "expired" })).unwrap();
        assert_eq!(
            ValidationOutcome::from(rejected),
            ValidationOutcome::Invalid(InvalidReason::Rejected("expired".into()))
        );

        let empty: ValidationResponse =
            serde_json::from_value(json!({ "success": true, "data": null })).unwrap();
        assert_eq!(
            ValidationOutcome::from(empty),
            ValidationOutcome::Invalid(InvalidReason::MissingPrincipal)
        );
    }

    #[test]
    fn body_without_success_flag_does_not_decode() {
        let res = serde_json::from_value::<ValidationResponse>(json!({ "data": null }));
        assert!(res.is_err());
    }
}
