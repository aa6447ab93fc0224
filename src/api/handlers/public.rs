/*
 * Responsibility
 * - GET /api/public/catalog: material types and statuses with display labels
 */
use axum::Json;
use serde::Serialize;

use crate::api::dto::envelope::ApiResponse;
use crate::domain::{MaterialStatus, MaterialType};

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Catalog {
    pub types: Vec<CatalogEntry>,
    pub statuses: Vec<CatalogEntry>,
}

pub async fn catalog() -> Json<ApiResponse<Catalog>> {
    let types = MaterialType::ALL
        .iter()
        .map(|t| CatalogEntry {
            value: t.as_str(),
            label: t.label(),
        })
        .collect();
    let statuses = MaterialStatus::ALL
        .iter()
        .map(|s| CatalogEntry {
            value: s.as_str(),
            label: s.label(),
        })
        .collect();

    Json(ApiResponse::ok(Catalog { types, statuses }, "catalog retrieved"))
}
