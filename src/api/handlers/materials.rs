/*
 * Responsibility
 * - /materials CRUD + lookup handlers
 * - Path/Query/Json via extractors, DTO validation, then repo calls
 * - empty list results are answered with 404 and a descriptive message
 *
 * Notes
 * - Role checks live in the route policy; handlers only take `CurrentUser` for audit logging.
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;

use crate::{
    api::{
        dto::{
            envelope::ApiResponse,
            locations::NameQuery,
            materials::{MaterialRequest, MaterialResponse, MaterialSearchParams},
        },
        extractors::CurrentUser,
    },
    domain::MaterialType,
    error::AppError,
    repos::{city_repo, material_repo, material_repo::MaterialRow},
    state::AppState,
};

type MaterialList = Json<ApiResponse<Vec<MaterialResponse>>>;

fn to_responses(rows: Vec<MaterialRow>) -> Result<Vec<MaterialResponse>, AppError> {
    rows.into_iter()
        .map(|row| MaterialResponse::try_from(row).map_err(AppError::from))
        .collect()
}

fn non_empty(rows: Vec<MaterialRow>, empty_message: String) -> Result<MaterialList, AppError> {
    if rows.is_empty() {
        return Err(AppError::not_found(empty_message));
    }
    let count = rows.len();
    let data = to_responses(rows)?;
    Ok(Json(ApiResponse::ok(data, format!("{count} materials found"))))
}

async fn ensure_city(state: &AppState, city_code: &str) -> Result<(), AppError> {
    if city_repo::exists(&state.db, city_code).await? {
        Ok(())
    } else {
        Err(AppError::not_found(format!("city '{city_code}' not found")))
    }
}

pub async fn list_materials(State(state): State<AppState>) -> Result<MaterialList, AppError> {
    let rows = material_repo::list(&state.db).await?;
    non_empty(rows, "no materials registered".to_string())
}

pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MaterialResponse>>, AppError> {
    let row = material_repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("material {id} not found")))?;

    Ok(Json(ApiResponse::ok(MaterialResponse::try_from(row)?, "material found")))
}

pub async fn create_material(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<MaterialRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MaterialResponse>>), AppError> {
    req.validate().map_err(AppError::validation)?;
    let write = req.as_write();
    ensure_city(&state, write.city_code).await?;

    let row = material_repo::create(&state.db, &write).await?;
    tracing::info!(material_id = row.id, subject = user.subject(), "material created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(MaterialResponse::try_from(row)?, "material created")),
    ))
}

pub async fn update_material(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<MaterialRequest>,
) -> Result<Json<ApiResponse<MaterialResponse>>, AppError> {
    req.validate().map_err(AppError::validation)?;
    let write = req.as_write();
    ensure_city(&state, write.city_code).await?;

    let row = material_repo::update(&state.db, id, &write)
        .await?
        .ok_or_else(|| AppError::not_found(format!("material {id} not found")))?;
    tracing::info!(material_id = id, subject = user.subject(), "material updated");

    Ok(Json(ApiResponse::ok(MaterialResponse::try_from(row)?, "material updated")))
}

pub async fn delete_material(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !material_repo::delete(&state.db, id).await? {
        return Err(AppError::not_found(format!("material {id} not found")));
    }
    tracing::info!(material_id = id, subject = user.subject(), "material deleted");

    Ok(Json(ApiResponse::ok((), "material deleted")))
}

pub async fn materials_by_type(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<MaterialList, AppError> {
    let material_type = raw
        .parse::<MaterialType>()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let rows = material_repo::list_by_type(&state.db, material_type).await?;
    non_empty(rows, format!("no materials of type {material_type}"))
}

pub async fn materials_by_purchase_date(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<MaterialList, AppError> {
    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation("purchase date must be formatted yyyy-MM-dd"))?;

    let rows = material_repo::list_by_purchase_date(&state.db, date).await?;
    non_empty(rows, format!("no materials purchased on {date}"))
}

pub async fn materials_by_city(
    State(state): State<AppState>,
    Path(city_code): Path<String>,
) -> Result<MaterialList, AppError> {
    let rows = material_repo::list_by_city(&state.db, &city_code).await?;
    non_empty(rows, format!("no materials in city '{city_code}'"))
}

pub async fn materials_by_department(
    State(state): State<AppState>,
    Path(department_code): Path<String>,
) -> Result<MaterialList, AppError> {
    let rows = material_repo::list_by_department(&state.db, &department_code).await?;
    non_empty(rows, format!("no materials in department '{department_code}'"))
}

pub async fn materials_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<MaterialList, AppError> {
    let name = query.validate().map_err(AppError::validation)?;

    let rows = material_repo::list_by_name(&state.db, name).await?;
    non_empty(rows, format!("no materials matching '{name}'"))
}

pub async fn search_materials(
    State(state): State<AppState>,
    Query(params): Query<MaterialSearchParams>,
) -> Result<MaterialList, AppError> {
    let rows = material_repo::search(&state.db, params.as_filter()).await?;
    non_empty(rows, "no materials match the search criteria".to_string())
}
