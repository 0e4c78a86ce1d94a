//! Modelo de VehicleService
//!
//! Registros de mantenimiento y servicio de los vehículos.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// VehicleService - mapea exactamente a la tabla vehicle_services
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleService {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub service_date: NaiveDate,
    pub odometer_km: Decimal,
    pub description: String,
    pub vendor_name: Option<String>,
    pub cost: Decimal,
    pub next_service_km: Option<Decimal>,
    pub next_service_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// VehicleService con la matrícula del vehículo resuelta
#[derive(Debug, Clone, FromRow)]
pub struct VehicleServiceWithRefs {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_registration: String,
    pub service_date: NaiveDate,
    pub odometer_km: Decimal,
    pub description: String,
    pub vendor_name: Option<String>,
    pub cost: Decimal,
    pub next_service_km: Option<Decimal>,
    pub next_service_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Request para registrar un servicio
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleServiceRequest {
    pub vehicle_id: Uuid,
    pub service_date: NaiveDate,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub odometer_km: Decimal,

    #[validate(length(min = 2, max = 500))]
    pub description: String,

    #[validate(length(min = 2, max = 150))]
    pub vendor_name: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub cost: Decimal,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub next_service_km: Option<Decimal>,

    pub next_service_date: Option<NaiveDate>,
}

/// Request para actualizar un servicio
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleServiceRequest {
    pub service_date: Option<NaiveDate>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub odometer_km: Option<Decimal>,

    #[validate(length(min = 2, max = 500))]
    pub description: Option<String>,

    #[validate(length(min = 2, max = 150))]
    pub vendor_name: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub cost: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub next_service_km: Option<Decimal>,

    pub next_service_date: Option<NaiveDate>,
}

/// Response de servicio para la API
#[derive(Debug, Serialize)]
pub struct VehicleServiceResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_registration: Option<String>,
    pub service_date: NaiveDate,
    pub odometer_km: Decimal,
    pub description: String,
    pub vendor_name: Option<String>,
    pub cost: Decimal,
    pub next_service_km: Option<Decimal>,
    pub next_service_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de servicios
#[derive(Debug, Deserialize)]
pub struct VehicleServiceFilters {
    pub vehicle_id: Option<Uuid>,
    pub service_after: Option<NaiveDate>,
    pub service_before: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<VehicleService> for VehicleServiceResponse {
    fn from(s: VehicleService) -> Self {
        Self {
            id: s.id,
            vehicle_id: s.vehicle_id,
            vehicle_registration: None,
            service_date: s.service_date,
            odometer_km: s.odometer_km,
            description: s.description,
            vendor_name: s.vendor_name,
            cost: s.cost,
            next_service_km: s.next_service_km,
            next_service_date: s.next_service_date,
            created_at: s.created_at,
        }
    }
}

impl From<VehicleServiceWithRefs> for VehicleServiceResponse {
    fn from(s: VehicleServiceWithRefs) -> Self {
        Self {
            id: s.id,
            vehicle_id: s.vehicle_id,
            vehicle_registration: Some(s.vehicle_registration),
            service_date: s.service_date,
            odometer_km: s.odometer_km,
            description: s.description,
            vendor_name: s.vendor_name,
            cost: s.cost,
            next_service_km: s.next_service_km,
            next_service_date: s.next_service_date,
            created_at: s.created_at,
        }
    }
}
