use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthzContext;

/// Handler-side view of the authenticated caller.
/// Reads the `AuthzContext` the Gate put into request extensions; absent means anonymous (401).
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthzContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthzContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}
