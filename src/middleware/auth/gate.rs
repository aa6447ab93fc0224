//! Request interception gate.
//!
//! Runs once per request ahead of the route policy:
//! bypass check → bearer extraction → remote validation → context install → forward.
//!
//! The gate never answers a request itself. Every failure (missing header, rejected
//! token, unreachable identity service, internal fault) ends with the request
//! forwarded without an `AuthzContext`; rejecting is the route policy's job.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::services::auth::{
    AuthzContext, BearerToken, ContextError, IdentityClient, InvalidReason, ValidationOutcome,
};

/// Paths starting with one of these are never authenticated.
pub const BYPASS_PREFIXES: &[&str] = &[
    "/api/public/",
    "/actuator/health",
    "/swagger-ui/",
    "/v3/api-docs",
];

/// Paths matched exactly.
pub const BYPASS_EXACT: &[&str] = &["/favicon.ico"];

pub fn is_bypassed(path: &str) -> bool {
    BYPASS_EXACT.contains(&path) || BYPASS_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Internal faults. Logged at error level; the request still goes through anonymously.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("authorization header is not visible ASCII")]
    HeaderEncoding,
    #[error("cannot build authorization context: {0}")]
    Context(#[from] ContextError),
}

/// Marker left in extensions so a second gate on the same request is a no-op.
#[derive(Debug, Clone, Copy)]
struct GateVisited;

#[derive(Clone)]
pub struct GateState {
    identity: Arc<dyn IdentityClient>,
}

impl GateState {
    pub fn new(identity: Arc<dyn IdentityClient>) -> Self {
        Self { identity }
    }
}

/// `None` when there is no `Authorization` header or it is not a bearer credential.
pub fn extract_bearer(headers: &HeaderMap) -> Result<Option<BearerToken>, GateError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| GateError::HeaderEncoding)?;

    Ok(BearerToken::from_header_value(value))
}

async fn resolve(
    identity: &dyn IdentityClient,
    token: &BearerToken,
) -> Result<Option<AuthzContext>, GateError> {
    match identity.check(token).await {
        ValidationOutcome::Valid(principal) => {
            let ctx = AuthzContext::from_principal(&principal)?;
            Ok(Some(ctx))
        }
        ValidationOutcome::Invalid(InvalidReason::MissingPrincipal) => {
            tracing::warn!("identity service reported success without a principal");
            Ok(None)
        }
        ValidationOutcome::Invalid(reason) => {
            tracing::debug!(%reason, "bearer token not accepted");
            Ok(None)
        }
    }
}

pub async fn gate(State(gate): State<GateState>, mut req: Request, next: Next) -> Response {
    if is_bypassed(req.uri().path()) {
        return next.run(req).await;
    }

    let extensions = req.extensions();
    if extensions.get::<GateVisited>().is_some() || extensions.get::<AuthzContext>().is_some() {
        return next.run(req).await;
    }
    req.extensions_mut().insert(GateVisited);

    let token = match extract_bearer(req.headers()) {
        Ok(Some(token)) => token,
        Ok(None) => return next.run(req).await,
        Err(err) => {
            tracing::error!(error = %err, "gate fault, continuing anonymously");
            return next.run(req).await;
        }
    };

    match resolve(gate.identity.as_ref(), &token).await {
        Ok(Some(ctx)) => {
            tracing::debug!(subject = ctx.subject(), "authorization context installed");
            req.extensions_mut().insert(ctx);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::error!(error = %err, "gate fault, continuing anonymously");
        }
    }

    next.run(req).await
}
