/*
 * Responsibility
 * - /cities read-only handlers (authenticated)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    api::dto::{
        envelope::ApiResponse,
        locations::{CityResponse, NameQuery},
    },
    error::AppError,
    repos::{city_repo, city_repo::CityRow},
    state::AppState,
};

type CityList = Json<ApiResponse<Vec<CityResponse>>>;

fn non_empty(rows: Vec<CityRow>, empty_message: String) -> Result<CityList, AppError> {
    if rows.is_empty() {
        return Err(AppError::not_found(empty_message));
    }
    let count = rows.len();
    let data = rows.into_iter().map(CityResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, format!("{count} cities found"))))
}

pub async fn list_cities(State(state): State<AppState>) -> Result<CityList, AppError> {
    let rows = city_repo::list(&state.db).await?;
    non_empty(rows, "no cities registered".to_string())
}

pub async fn get_city(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<CityResponse>>, AppError> {
    let row = city_repo::get(&state.db, &code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("city '{code}' not found")))?;

    Ok(Json(ApiResponse::ok(CityResponse::from(row), "city found")))
}

pub async fn cities_by_department(
    State(state): State<AppState>,
    Path(department_code): Path<String>,
) -> Result<CityList, AppError> {
    let rows = city_repo::list_by_department(&state.db, &department_code).await?;
    non_empty(rows, format!("no cities in department '{department_code}'"))
}

pub async fn cities_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<CityList, AppError> {
    let name = query.validate().map_err(AppError::validation)?;

    let rows = city_repo::list_by_name(&state.db, name).await?;
    non_empty(rows, format!("no cities matching '{name}'"))
}
