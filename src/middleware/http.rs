//! Transport-level layers shared by every route.
//!
//! - `x-request-id`: generated when absent, echoed on the response
//! - access log via `TraceLayer`
//! - request body limit and a global deadline; both failures answer with the JSON envelope

use std::time::Duration;

use axum::{
    Json, Router,
    error_handling::HandleErrorLayer,
    http::{StatusCode, header::HeaderName},
    response::{IntoResponse, Response},
};
use tower::{BoxError, ServiceBuilder, timeout::TimeoutLayer};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::api::dto::envelope::ApiResponse;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        let body = ApiResponse::<()>::error("REQUEST_TIMEOUT", "request took too long");
        return (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response();
    }

    tracing::error!(error = %err, "unhandled middleware error");
    let body = ApiResponse::<()>::error("INTERNAL_SERVER_ERROR", "internal server error");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

pub fn apply(router: Router) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_layer_error))
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    router.layer(layers)
}
