/*
 * Responsibility
 * - City / Department response DTOs
 * - `?name=` query used by the by-name lookups
 */
use serde::{Deserialize, Serialize};

use crate::repos::{city_repo::CityRow, department_repo::DepartmentRow};

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentResponse {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityResponse {
    pub code: String,
    pub name: String,
    pub department: DepartmentResponse,
}

impl CityResponse {
    pub fn new(
        code: String,
        name: String,
        department_code: String,
        department_name: String,
    ) -> Self {
        Self {
            code,
            name,
            department: DepartmentResponse {
                code: department_code,
                name: department_name,
            },
        }
    }
}

impl From<CityRow> for CityResponse {
    fn from(row: CityRow) -> Self {
        Self::new(row.code, row.name, row.department_code, row.department_name)
    }
}

impl From<DepartmentRow> for DepartmentResponse {
    fn from(row: DepartmentRow) -> Self {
        Self {
            code: row.code,
            name: row.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

impl NameQuery {
    pub fn validate(&self) -> Result<&str, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required");
        }
        Ok(name)
    }
}
