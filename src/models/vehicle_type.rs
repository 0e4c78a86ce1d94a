//! Modelo de VehicleType
//!
//! Tipos de vehículo con sus tarifas de facturación por km.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// VehicleType - mapea exactamente a la tabla vehicle_types
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub rate_per_km: Decimal,
    pub minimum_km_per_day: Decimal,
    pub driver_bata_per_day: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un nuevo tipo de vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleTypeRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(max = 300))]
    pub description: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub rate_per_km: Decimal,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub minimum_km_per_day: Decimal,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub driver_bata_per_day: Decimal,
}

/// Request para actualizar un tipo de vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleTypeRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 300))]
    pub description: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub rate_per_km: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub minimum_km_per_day: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub driver_bata_per_day: Option<Decimal>,
}

/// Response de tipo de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleTypeResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub rate_per_km: Decimal,
    pub minimum_km_per_day: Decimal,
    pub driver_bata_per_day: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de tipos de vehículo
#[derive(Debug, Deserialize)]
pub struct VehicleTypeFilters {
    pub name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<VehicleType> for VehicleTypeResponse {
    fn from(vt: VehicleType) -> Self {
        Self {
            id: vt.id,
            name: vt.name,
            description: vt.description,
            rate_per_km: vt.rate_per_km,
            minimum_km_per_day: vt.minimum_km_per_day,
            driver_bata_per_day: vt.driver_bata_per_day,
            created_at: vt.created_at,
        }
    }
}
