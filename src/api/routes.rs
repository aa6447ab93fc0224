/*
 * Responsibility
 * - URL layout of the service (/api/materials, /api/cities, /api/departments, /api/public, /actuator)
 * - Access rules are NOT attached here; the route policy table decides them per method + path
 */
use axum::{Router, http::Uri, routing::get};

use crate::{error::AppError, state::AppState};

use crate::api::handlers::{
    cities::{cities_by_department, cities_by_name, get_city, list_cities},
    departments::{departments_by_name, get_department, list_departments},
    health::{health, info},
    materials::{
        create_material, delete_material, get_material, list_materials, materials_by_city,
        materials_by_department, materials_by_name, materials_by_purchase_date,
        materials_by_type, search_materials, update_material,
    },
    public::catalog,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/materials", materials())
        .nest("/api/cities", cities())
        .nest("/api/departments", departments())
        .route("/api/public/catalog", get(catalog))
        .route("/actuator/health", get(health))
        .route("/actuator/info", get(info))
        .fallback(unknown_route)
}

async fn unknown_route(uri: Uri) -> AppError {
    AppError::not_found(format!("no resource at {}", uri.path()))
}

fn materials() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route(
            "/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/by-type/{type}", get(materials_by_type))
        .route("/by-purchase-date/{date}", get(materials_by_purchase_date))
        .route("/by-city/{city_code}", get(materials_by_city))
        .route("/by-department/{department_code}", get(materials_by_department))
        .route("/by-name", get(materials_by_name))
        .route("/search", get(search_materials))
}

fn cities() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cities))
        .route("/{code}", get(get_city))
        .route("/by-department/{department_code}", get(cities_by_department))
        .route("/by-name", get(cities_by_name))
}

fn departments() -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments))
        .route("/{code}", get(get_department))
        .route("/by-name", get(departments_by_name))
}
