use sqlx::{FromRow, PgPool};

use crate::repos::{contains_pattern, error::RepoError};

#[derive(Debug, Clone, FromRow)]
pub struct DepartmentRow {
    pub code: String,
    pub name: String,
}

pub async fn list(db: &PgPool) -> Result<Vec<DepartmentRow>, RepoError> {
    let rows = sqlx::query_as::<_, DepartmentRow>(
        r#"
        SELECT code, name
        FROM departments
        ORDER BY name ASC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, code: &str) -> Result<Option<DepartmentRow>, RepoError> {
    let row = sqlx::query_as::<_, DepartmentRow>(
        r#"
        SELECT code, name
        FROM departments
        WHERE code = $1
        "#,
    )
    .bind(code)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list_by_name(db: &PgPool, name: &str) -> Result<Vec<DepartmentRow>, RepoError> {
    let rows = sqlx::query_as::<_, DepartmentRow>(
        r#"
        SELECT code, name
        FROM departments
        WHERE name ILIKE $1 ESCAPE '\'
        ORDER BY name ASC
        "#,
    )
    .bind(contains_pattern(name))
    .fetch_all(db)
    .await?;

    Ok(rows)
}
