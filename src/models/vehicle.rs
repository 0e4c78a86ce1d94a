//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Inactive,
}

/// Vehicle - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub registration_number: String,
    pub vehicle_type_id: Uuid,
    pub model: Option<String>,
    pub manufacture_year: Option<i32>,
    pub vehicle_status: VehicleStatus,
    pub fc_expiry: Option<NaiveDate>,
    pub permit_expiry: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub current_odometer: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Vehicle con el nombre de su tipo resuelto (JOIN con vehicle_types)
#[derive(Debug, Clone, FromRow)]
pub struct VehicleWithType {
    pub id: Uuid,
    pub registration_number: String,
    pub vehicle_type_id: Uuid,
    pub vehicle_type_name: String,
    pub model: Option<String>,
    pub manufacture_year: Option<i32>,
    pub vehicle_status: VehicleStatus,
    pub fc_expiry: Option<NaiveDate>,
    pub permit_expiry: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub current_odometer: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Request para crear un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "crate::utils::validation::validate_registration_number")]
    pub registration_number: String,

    pub vehicle_type_id: Uuid,

    #[validate(length(min = 2, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1990, max = 2030))]
    pub manufacture_year: Option<i32>,

    pub fc_expiry: Option<NaiveDate>,
    pub permit_expiry: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub current_odometer: Option<Decimal>,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "crate::utils::validation::validate_registration_number")]
    pub registration_number: Option<String>,

    pub vehicle_type_id: Option<Uuid>,

    #[validate(length(min = 2, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1990, max = 2030))]
    pub manufacture_year: Option<i32>,

    pub vehicle_status: Option<VehicleStatus>,

    pub fc_expiry: Option<NaiveDate>,
    pub permit_expiry: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub current_odometer: Option<Decimal>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub registration_number: String,
    pub vehicle_type_id: Uuid,
    pub vehicle_type_name: Option<String>,
    pub model: Option<String>,
    pub manufacture_year: Option<i32>,
    pub vehicle_status: VehicleStatus,
    pub fc_expiry: Option<NaiveDate>,
    pub permit_expiry: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub current_odometer: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de vehículos
#[derive(Debug, Deserialize)]
pub struct VehicleFilters {
    pub vehicle_status: Option<VehicleStatus>,
    pub vehicle_type_id: Option<Uuid>,
    pub registration_number: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            registration_number: vehicle.registration_number,
            vehicle_type_id: vehicle.vehicle_type_id,
            vehicle_type_name: None,
            model: vehicle.model,
            manufacture_year: vehicle.manufacture_year,
            vehicle_status: vehicle.vehicle_status,
            fc_expiry: vehicle.fc_expiry,
            permit_expiry: vehicle.permit_expiry,
            insurance_expiry: vehicle.insurance_expiry,
            current_odometer: vehicle.current_odometer,
            created_at: vehicle.created_at,
        }
    }
}

impl From<VehicleWithType> for VehicleResponse {
    fn from(vehicle: VehicleWithType) -> Self {
        Self {
            id: vehicle.id,
            registration_number: vehicle.registration_number,
            vehicle_type_id: vehicle.vehicle_type_id,
            vehicle_type_name: Some(vehicle.vehicle_type_name),
            model: vehicle.model,
            manufacture_year: vehicle.manufacture_year,
            vehicle_status: vehicle.vehicle_status,
            fc_expiry: vehicle.fc_expiry,
            permit_expiry: vehicle.permit_expiry,
            insurance_expiry: vehicle.insurance_expiry,
            current_odometer: vehicle.current_odometer,
            created_at: vehicle.created_at,
        }
    }
}
