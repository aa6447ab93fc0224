//! Route policy enforcer.
//!
//! Explicit table of (method, path pattern) → required access, evaluated after the gate.
//! This is the only place in the request path that turns "no context" into 401 and
//! "wrong authorities" into 403.
//!
//! Patterns are matchit routes (`{param}` segments). A trailing `/**` registers the prefix
//! itself plus everything below it. Lookup order: method table, any-method table, fallback.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::AppError;
use crate::services::auth::AuthzContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    /// Caller must hold at least one of these authorities (`ROLE_ADMIN`, `READ_MATERIAL`, ...).
    AnyAuthority(BTreeSet<String>),
}

impl Access {
    pub fn any_of<I, A>(authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::AnyAuthority(authorities.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Unauthenticated,
    Forbidden,
}

pub fn decide(access: &Access, ctx: Option<&AuthzContext>) -> Decision {
    match (access, ctx) {
        (Access::Public, _) => Decision::Permit,
        (_, None) => Decision::Unauthenticated,
        (Access::Authenticated, Some(_)) => Decision::Permit,
        (Access::AnyAuthority(required), Some(ctx)) => {
            if ctx.has_any_authority(required) {
                Decision::Permit
            } else {
                Decision::Forbidden
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

pub struct RoutePolicy {
    by_method: HashMap<Method, matchit::Router<Access>>,
    any_method: matchit::Router<Access>,
    fallback: Access,
}

impl RoutePolicy {
    pub fn builder() -> RoutePolicyBuilder {
        RoutePolicyBuilder {
            rules: Vec::new(),
            fallback: Access::Authenticated,
        }
    }

    /// Rules of this service. Write operations on materials are role-gated,
    /// reads need any authenticated caller, docs/health/public are open.
    pub fn materials_api() -> Result<Self, PolicyError> {
        let writers = Access::any_of(["ROLE_ADMIN", "ROLE_MANAGER"]);

        Self::builder()
            .any("/api/public/**", Access::Public)
            .any("/actuator/health", Access::Public)
            .any("/actuator/info", Access::Public)
            .any("/swagger-ui/**", Access::Public)
            .any("/swagger-ui.html", Access::Public)
            .any("/v3/api-docs/**", Access::Public)
            .any("/swagger-resources/**", Access::Public)
            .any("/webjars/**", Access::Public)
            .any("/favicon.ico", Access::Public)
            .route(Method::POST, "/api/materials", writers.clone())
            .route(Method::PUT, "/api/materials/{id}", writers)
            .route(
                Method::DELETE,
                "/api/materials/{id}",
                Access::any_of(["ROLE_ADMIN"]),
            )
            .any("/api/materials/**", Access::Authenticated)
            .any("/api/cities/**", Access::Authenticated)
            .any("/api/departments/**", Access::Authenticated)
            .build()
    }

    pub fn access_for(&self, method: &Method, path: &str) -> &Access {
        if let Some(access) = self
            .by_method
            .get(method)
            .and_then(|table| table.at(path).ok())
        {
            return access.value;
        }
        match self.any_method.at(path) {
            Ok(found) => found.value,
            Err(_) => &self.fallback,
        }
    }

    pub fn check(&self, method: &Method, path: &str, ctx: Option<&AuthzContext>) -> Decision {
        decide(self.access_for(method, path), ctx)
    }
}

pub struct RoutePolicyBuilder {
    rules: Vec<(Option<Method>, String, Access)>,
    fallback: Access,
}

impl RoutePolicyBuilder {
    pub fn route(mut self, method: Method, pattern: &str, access: Access) -> Self {
        self.rules.push((Some(method), pattern.to_string(), access));
        self
    }

    pub fn any(mut self, pattern: &str, access: Access) -> Self {
        self.rules.push((None, pattern.to_string(), access));
        self
    }

    pub fn fallback(mut self, access: Access) -> Self {
        self.fallback = access;
        self
    }

    pub fn build(self) -> Result<RoutePolicy, PolicyError> {
        let mut by_method: HashMap<Method, matchit::Router<Access>> = HashMap::new();
        let mut any_method = matchit::Router::new();

        for (method, pattern, access) in self.rules {
            let table = match method {
                Some(method) => by_method.entry(method).or_insert_with(matchit::Router::new),
                None => &mut any_method,
            };
            for route in expand(&pattern) {
                table
                    .insert(route, access.clone())
                    .map_err(|e| PolicyError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })?;
            }
        }

        Ok(RoutePolicy {
            by_method,
            any_method,
            fallback: self.fallback,
        })
    }
}

// "/a/**" → ["/a", "/a/{*rest}"]
fn expand(pattern: &str) -> Vec<String> {
    match pattern.strip_suffix("/**") {
        Some(prefix) => vec![prefix.to_string(), format!("{prefix}/{{*rest}}")],
        None => vec![pattern.to_string()],
    }
}

pub async fn enforce(State(policy): State<Arc<RoutePolicy>>, req: Request, next: Next) -> Response {
    let decision = policy.check(
        req.method(),
        req.uri().path(),
        req.extensions().get::<AuthzContext>(),
    );

    match decision {
        Decision::Permit => next.run(req).await,
        Decision::Unauthenticated => {
            tracing::debug!(method = %req.method(), path = req.uri().path(), "anonymous request denied");
            AppError::Unauthorized.into_response()
        }
        Decision::Forbidden => {
            tracing::debug!(method = %req.method(), path = req.uri().path(), "insufficient authorities");
            AppError::Forbidden.into_response()
        }
    }
}
