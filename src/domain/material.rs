/*
 * Responsibility
 * - Material classification enums shared by DTOs, repos and the public catalog
 * - Wire/storage literal <-> variant mapping in one place
 */
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! literal_enum {
    (
        $name:ident, $kind:literal,
        [$($variant:ident => $literal:literal, $label:literal),+ $(,)?]
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Literal used on the wire and in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $literal,)+
                }
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

literal_enum!(MaterialType, "material type", [
    Electronic => "ELECTRONICO", "Electrónico",
    Mechanical => "MECANICO", "Mecánico",
    Chemical => "QUIMICO", "Químico",
    Textile => "TEXTIL", "Textil",
    Construction => "CONSTRUCCION", "Construcción",
    Tool => "HERRAMIENTA", "Herramienta",
    Office => "OFICINA", "Oficina",
]);

literal_enum!(MaterialStatus, "material status", [
    Active => "ACTIVE", "Activo",
    Available => "AVAILABLE", "Disponible",
    Assigned => "ASSIGNED", "Asignado",
    Inactive => "INACTIVE", "Inactivo",
    Damaged => "DAMAGED", "Dañado",
    Sold => "SOLD", "Vendido",
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_storage_literals() {
        let json = serde_json::to_string(&MaterialType::Tool).unwrap();
        assert_eq!(json, "\"HERRAMIENTA\"");

        let status: MaterialStatus = serde_json::from_str("\"SOLD\"").unwrap();
        assert_eq!(status, MaterialStatus::Sold);
    }

    #[test]
    fn unknown_literal_is_reported() {
        let err = "PLASTICO".parse::<MaterialType>().unwrap_err();
        assert_eq!(err.kind, "material type");
        assert_eq!(err.value, "PLASTICO");
    }
}
