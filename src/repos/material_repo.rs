/*
 * Responsibility
 * - materials CRUD + lookups (SQLx, PgPool)
 * - every read joins city and department so handlers can answer in one query
 * - the by-field lookups are single-filter searches
 */
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::domain::{MaterialStatus, MaterialType};
use crate::repos::{contains_pattern, error::RepoError};

const SELECT_MATERIALS: &str = r#"
    SELECT
        m.id, m.name, m.description, m.type AS material_type, m.price,
        m.purchase_date, m.sale_date, m.status,
        c.code AS city_code, c.name AS city_name,
        d.code AS department_code, d.name AS department_name,
        m.created_at, m.updated_at
    FROM materials m
    JOIN cities c ON c.code = m.city_code
    JOIN departments d ON d.code = c.department_code
"#;

const ORDER_NEWEST_FIRST: &str = "ORDER BY m.purchase_date DESC, m.id DESC";

#[derive(Debug, Clone, FromRow)]
pub struct MaterialRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub material_type: String,
    pub price: Decimal,
    pub purchase_date: NaiveDate,
    pub sale_date: Option<NaiveDate>,
    pub status: String,
    pub city_code: String,
    pub city_name: String,
    pub department_code: String,
    pub department_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for insert/update. Already validated by the DTO layer.
#[derive(Debug, Clone)]
pub struct MaterialWrite<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub material_type: MaterialType,
    pub price: Decimal,
    pub purchase_date: NaiveDate,
    pub sale_date: Option<NaiveDate>,
    pub status: MaterialStatus,
    pub city_code: &'a str,
}

/// AND-combined optional filters. `None` means "any".
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialFilter<'a> {
    pub material_type: Option<MaterialType>,
    pub purchase_date: Option<NaiveDate>,
    pub city_code: Option<&'a str>,
    pub department_code: Option<&'a str>,
}

pub async fn list(db: &PgPool) -> Result<Vec<MaterialRow>, RepoError> {
    search(db, MaterialFilter::default()).await
}

pub async fn get(db: &PgPool, id: i64) -> Result<Option<MaterialRow>, RepoError> {
    let sql = format!("{SELECT_MATERIALS} WHERE m.id = $1");
    let row = sqlx::query_as::<_, MaterialRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn search(db: &PgPool, filter: MaterialFilter<'_>) -> Result<Vec<MaterialRow>, RepoError> {
    let sql = format!(
        r#"{SELECT_MATERIALS}
        WHERE ($1::varchar IS NULL OR m.type = $1)
          AND ($2::date IS NULL OR m.purchase_date = $2)
          AND ($3::varchar IS NULL OR m.city_code = $3)
          AND ($4::varchar IS NULL OR c.department_code = $4)
        {ORDER_NEWEST_FIRST}"#
    );

    let rows = sqlx::query_as::<_, MaterialRow>(&sql)
        .bind(filter.material_type.map(|t| t.as_str()))
        .bind(filter.purchase_date)
        .bind(filter.city_code)
        .bind(filter.department_code)
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn list_by_type(
    db: &PgPool,
    material_type: MaterialType,
) -> Result<Vec<MaterialRow>, RepoError> {
    let filter = MaterialFilter {
        material_type: Some(material_type),
        ..MaterialFilter::default()
    };
    search(db, filter).await
}

pub async fn list_by_purchase_date(
    db: &PgPool,
    purchase_date: NaiveDate,
) -> Result<Vec<MaterialRow>, RepoError> {
    let filter = MaterialFilter {
        purchase_date: Some(purchase_date),
        ..MaterialFilter::default()
    };
    search(db, filter).await
}

pub async fn list_by_city(db: &PgPool, city_code: &str) -> Result<Vec<MaterialRow>, RepoError> {
    let filter = MaterialFilter {
        city_code: Some(city_code),
        ..MaterialFilter::default()
    };
    search(db, filter).await
}

pub async fn list_by_department(
    db: &PgPool,
    department_code: &str,
) -> Result<Vec<MaterialRow>, RepoError> {
    let filter = MaterialFilter {
        department_code: Some(department_code),
        ..MaterialFilter::default()
    };
    search(db, filter).await
}

pub async fn list_by_name(db: &PgPool, name: &str) -> Result<Vec<MaterialRow>, RepoError> {
    let sql = format!(r#"{SELECT_MATERIALS} WHERE m.name ILIKE $1 ESCAPE '\' {ORDER_NEWEST_FIRST}"#);
    let rows = sqlx::query_as::<_, MaterialRow>(&sql)
        .bind(contains_pattern(name))
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn create(db: &PgPool, material: &MaterialWrite<'_>) -> Result<MaterialRow, RepoError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO materials
            (name, description, type, price, purchase_date, sale_date, status, city_code)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(material.name)
    .bind(material.description)
    .bind(material.material_type.as_str())
    .bind(material.price)
    .bind(material.purchase_date)
    .bind(material.sale_date)
    .bind(material.status.as_str())
    .bind(material.city_code)
    .fetch_one(db)
    .await?;

    get(db, id)
        .await?
        .ok_or_else(|| RepoError::Corrupt(format!("material {id} vanished after insert")))
}

pub async fn update(
    db: &PgPool,
    id: i64,
    material: &MaterialWrite<'_>,
) -> Result<Option<MaterialRow>, RepoError> {
    let updated: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE materials
        SET
            name = $2,
            description = $3,
            type = $4,
            price = $5,
            purchase_date = $6,
            sale_date = $7,
            status = $8,
            city_code = $9,
            updated_at = now()
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(material.name)
    .bind(material.description)
    .bind(material.material_type.as_str())
    .bind(material.price)
    .bind(material.purchase_date)
    .bind(material.sale_date)
    .bind(material.status.as_str())
    .bind(material.city_code)
    .fetch_optional(db)
    .await?;

    match updated {
        Some(id) => get(db, id).await,
        None => Ok(None),
    }
}

pub async fn delete(db: &PgPool, id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM materials
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
