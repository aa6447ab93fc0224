use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    api::dto::{
        envelope::ApiResponse,
        locations::{DepartmentResponse, NameQuery},
    },
    error::AppError,
    repos::department_repo,
    state::AppState,
};

type DepartmentList = Json<ApiResponse<Vec<DepartmentResponse>>>;

pub async fn list_departments(State(state): State<AppState>) -> Result<DepartmentList, AppError> {
    let rows = department_repo::list(&state.db).await?;
    if rows.is_empty() {
        return Err(AppError::not_found("no departments registered"));
    }

    let count = rows.len();
    let data = rows.into_iter().map(DepartmentResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, format!("{count} departments found"))))
}

pub async fn get_department(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<DepartmentResponse>>, AppError> {
    let row = department_repo::get(&state.db, &code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("department '{code}' not found")))?;

    Ok(Json(ApiResponse::ok(row.into(), "department found")))
}

pub async fn departments_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<DepartmentList, AppError> {
    let name = query.validate().map_err(AppError::validation)?;

    let rows = department_repo::list_by_name(&state.db, name).await?;
    if rows.is_empty() {
        return Err(AppError::not_found(format!("no departments matching '{name}'")));
    }

    let count = rows.len();
    let data = rows.into_iter().map(DepartmentResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, format!("{count} departments found"))))
}
