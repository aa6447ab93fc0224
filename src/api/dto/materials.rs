/*
 * Responsibility
 * - Materials request/response DTOs
 * - validate() for field rules (lengths, price > 0, sale date not before purchase date)
 */
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::dto::locations::CityResponse;
use crate::domain::{MaterialStatus, MaterialType};
use crate::repos::{
    error::RepoError,
    material_repo::{MaterialFilter, MaterialRow, MaterialWrite},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    pub price: Decimal,
    pub purchase_date: NaiveDate,
    #[serde(default)]
    pub sale_date: Option<NaiveDate>,
    pub status: MaterialStatus,
    pub city_code: String,
}

impl MaterialRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if !(2..=100).contains(&self.name.chars().count()) {
            return Err("name must be between 2 and 100 characters");
        }
        if self.description.trim().is_empty() {
            return Err("description is required");
        }
        if !(10..=500).contains(&self.description.chars().count()) {
            return Err("description must be between 10 and 500 characters");
        }
        if self.price < Decimal::new(1, 2) {
            return Err("price must be greater than 0");
        }
        if let Some(sale_date) = self.sale_date
            && sale_date < self.purchase_date
        {
            return Err("sale date cannot be before purchase date");
        }
        if self.city_code.trim().is_empty() {
            return Err("city code is required");
        }

        Ok(())
    }

    pub fn as_write(&self) -> MaterialWrite<'_> {
        MaterialWrite {
            name: &self.name,
            description: &self.description,
            material_type: self.material_type,
            price: self.price,
            purchase_date: self.purchase_date,
            sale_date: self.sale_date,
            status: self.status,
            city_code: self.city_code.trim(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSearchParams {
    #[serde(rename = "type")]
    pub material_type: Option<MaterialType>,
    pub purchase_date: Option<NaiveDate>,
    pub city_code: Option<String>,
    pub department_code: Option<String>,
}

impl MaterialSearchParams {
    pub fn as_filter(&self) -> MaterialFilter<'_> {
        MaterialFilter {
            material_type: self.material_type,
            purchase_date: self.purchase_date,
            city_code: non_blank(self.city_code.as_deref()),
            department_code: non_blank(self.department_code.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub purchase_date: NaiveDate,
    pub sale_date: Option<NaiveDate>,
    pub status: MaterialStatus,
    pub city: CityResponse,
}

impl TryFrom<MaterialRow> for MaterialResponse {
    type Error = RepoError;

    fn try_from(row: MaterialRow) -> Result<Self, Self::Error> {
        let material_type = row
            .material_type
            .parse::<MaterialType>()
            .map_err(|e| RepoError::Corrupt(format!("material {}: {e}", row.id)))?;
        let status = row
            .status
            .parse::<MaterialStatus>()
            .map_err(|e| RepoError::Corrupt(format!("material {}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            material_type,
            price: row.price,
            purchase_date: row.purchase_date,
            sale_date: row.sale_date,
            status,
            city: CityResponse::new(
                row.city_code,
                row.city_name,
                row.department_code,
                row.department_name,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> MaterialRequest {
        serde_json::from_value(json!({
            "name": "Taladro percutor",
            "description": "Taladro de 800W con maletín",
            "type": "HERRAMIENTA",
            "price": "249.90",
            "purchaseDate": "2024-03-01",
            "saleDate": null,
            "status": "AVAILABLE",
            "cityCode": "BOG"
        }))
        .unwrap()
    }

    #[test]
    fn well_formed_request_passes() {
        let req = request();
        assert_eq!(req.validate(), Ok(()));
        assert_eq!(req.material_type, MaterialType::Tool);
        assert_eq!(req.price, Decimal::new(24990, 2));
    }

    #[test]
    fn short_description_is_rejected() {
        let req = MaterialRequest {
            description: "corto".into(),
            ..request()
        };
        assert_eq!(
            req.validate(),
            Err("description must be between 10 and 500 characters")
        );
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let req = MaterialRequest {
            price: Decimal::ZERO,
            ..request()
        };
        assert_eq!(req.validate(), Err("price must be greater than 0"));
    }

    #[test]
    fn sale_before_purchase_is_rejected() {
        let req = MaterialRequest {
            sale_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..request()
        };
        assert_eq!(req.validate(), Err("sale date cannot be before purchase date"));

        let same_day = MaterialRequest {
            sale_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..request()
        };
        assert_eq!(same_day.validate(), Ok(()));
    }

    #[test]
    fn blank_search_codes_are_ignored() {
        let params = MaterialSearchParams {
            city_code: Some("  ".into()),
            department_code: Some("DC".into()),
            ..MaterialSearchParams::default()
        };
        let filter = params.as_filter();
        assert_eq!(filter.city_code, None);
        assert_eq!(filter.department_code, Some("DC"));
    }
}
