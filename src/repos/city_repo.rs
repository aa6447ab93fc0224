/*
 * Responsibility
 * - cities lookups (each row carries its department)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::{contains_pattern, error::RepoError};

const SELECT_CITIES: &str = r#"
    SELECT
        c.code, c.name,
        d.code AS department_code, d.name AS department_name
    FROM cities c
    JOIN departments d ON d.code = c.department_code
"#;

#[derive(Debug, Clone, FromRow)]
pub struct CityRow {
    pub code: String,
    pub name: String,
    pub department_code: String,
    pub department_name: String,
}

pub async fn list(db: &PgPool) -> Result<Vec<CityRow>, RepoError> {
    let sql = format!("{SELECT_CITIES} ORDER BY c.name ASC");
    let rows = sqlx::query_as::<_, CityRow>(&sql).fetch_all(db).await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, code: &str) -> Result<Option<CityRow>, RepoError> {
    let sql = format!("{SELECT_CITIES} WHERE c.code = $1");
    let row = sqlx::query_as::<_, CityRow>(&sql)
        .bind(code)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn exists(db: &PgPool, code: &str) -> Result<bool, RepoError> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cities WHERE code = $1)")
        .bind(code)
        .fetch_one(db)
        .await?;

    Ok(found)
}

pub async fn list_by_department(
    db: &PgPool,
    department_code: &str,
) -> Result<Vec<CityRow>, RepoError> {
    let sql = format!("{SELECT_CITIES} WHERE c.department_code = $1 ORDER BY c.name ASC");
    let rows = sqlx::query_as::<_, CityRow>(&sql)
        .bind(department_code)
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn list_by_name(db: &PgPool, name: &str) -> Result<Vec<CityRow>, RepoError> {
    let sql = format!(r#"{SELECT_CITIES} WHERE c.name ILIKE $1 ESCAPE '\' ORDER BY c.name ASC"#);
    let rows = sqlx::query_as::<_, CityRow>(&sql)
        .bind(contains_pattern(name))
        .fetch_all(db)
        .await?;

    Ok(rows)
}
