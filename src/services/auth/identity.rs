//! Remote identity client.
//!
//! Validates a bearer token against the identity service and returns the principal
//! asserted for it. Every failure mode (transport, timeout, status, body) is turned
//! into a `ValidationOutcome::Invalid` plus a log line; nothing here returns an error
//! to the caller once the client is built.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderValue},
};
use thiserror::Error;
use url::Url;

use crate::services::auth::principal::{
    BearerToken, InvalidReason, Principal, ValidationOutcome, ValidationResponse,
};

pub const VALIDATE_PATH: &str = "/api/auth/validate";

#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// One round trip to the identity service.
    async fn check(&self, token: &BearerToken) -> ValidationOutcome;

    /// `true` only for HTTP 200 with `success: true`.
    async fn validate(&self, token: &BearerToken) -> bool {
        self.check(token).await.is_valid()
    }

    async fn fetch_principal(&self, token: &BearerToken) -> Option<Principal> {
        self.check(token).await.into_principal()
    }
}

/// Construction-time failures. These are configuration errors and stop startup.
#[derive(Debug, Error)]
pub enum IdentityClientError {
    #[error("invalid identity service url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP implementation backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    client: Client,
    validate_url: Url,
}

impl HttpIdentityClient {
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, IdentityClientError> {
        let validate_url = validate_url(base_url)?;

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            validate_url,
        })
    }

    pub fn validate_url(&self) -> &Url {
        &self.validate_url
    }

    async fn round_trip(&self, token: &BearerToken) -> ValidationOutcome {
        let json = HeaderValue::from_static("application/json");

        let response = match self
            .client
            .get(self.validate_url.clone())
            .bearer_auth(token.as_str())
            .header(ACCEPT, json.clone())
            .header(CONTENT_TYPE, json)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                return ValidationOutcome::Invalid(InvalidReason::Timeout);
            }
            Err(err) => {
                return ValidationOutcome::Invalid(InvalidReason::Transport(err.to_string()));
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return ValidationOutcome::Invalid(InvalidReason::Status(status));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) if err.is_timeout() => {
                return ValidationOutcome::Invalid(InvalidReason::Timeout);
            }
            Err(err) => {
                return ValidationOutcome::Invalid(InvalidReason::Transport(err.to_string()));
            }
        };

        if body.is_empty() {
            return ValidationOutcome::Invalid(InvalidReason::MalformedBody("empty body".into()));
        }

        match serde_json::from_slice::<ValidationResponse>(&body) {
            Ok(parsed) => parsed.into(),
            Err(err) => ValidationOutcome::Invalid(InvalidReason::MalformedBody(err.to_string())),
        }
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn check(&self, token: &BearerToken) -> ValidationOutcome {
        tracing::debug!(url = %self.validate_url, "validating token against identity service");

        let outcome = self.round_trip(token).await;
        match &outcome {
            ValidationOutcome::Valid(principal) => {
                tracing::debug!(username = %principal.username, "token validated");
            }
            ValidationOutcome::Invalid(
                reason @ (InvalidReason::Transport(_) | InvalidReason::Timeout),
            ) => {
                tracing::error!(error = %reason, "token validation failed");
            }
            ValidationOutcome::Invalid(reason) => {
                tracing::warn!(error = %reason, "token invalid or unexpected response");
            }
        }

        outcome
    }
}

fn validate_url(base_url: &str) -> Result<Url, IdentityClientError> {
    let invalid = |reason: String| IdentityClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let base = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{base}{VALIDATE_PATH}")).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
