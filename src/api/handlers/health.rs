/*
 * Responsibility
 * - GET /actuator/health (liveness, bypasses the Gate)
 * - GET /actuator/info (service name + version, public)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "UP" })))
}

pub async fn info() -> impl IntoResponse {
    Json(json!({
        "app": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
