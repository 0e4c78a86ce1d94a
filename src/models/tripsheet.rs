//! Modelo de Tripsheet
//!
//! Hojas de viaje: el documento operativo del que se deriva la facturación.
//! El serial tiene formato TS-YYYY-NNNN.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Estado de la hoja de viaje - mapea al ENUM tripsheet_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "tripsheet_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripsheetStatus {
    Open,
    Closed,
    Billed,
}

/// Tripsheet - mapea exactamente a la tabla tripsheets
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tripsheet {
    pub id: Uuid,
    pub serial: String,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub customer_name: String,
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub opening_km: Decimal,
    pub closing_km: Option<Decimal>,
    pub total_km: Option<Decimal>,
    pub driver_advance: Decimal,
    pub toll_charges: Decimal,
    pub other_charges: Decimal,
    pub notes: Option<String>,
    pub tripsheet_status: TripsheetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tripsheet con referencias resueltas (JOIN con vehicles y users)
#[derive(Debug, Clone, FromRow)]
pub struct TripsheetWithRefs {
    pub id: Uuid,
    pub serial: String,
    pub vehicle_id: Uuid,
    pub vehicle_registration: String,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub customer_name: String,
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub opening_km: Decimal,
    pub closing_km: Option<Decimal>,
    pub total_km: Option<Decimal>,
    pub driver_advance: Decimal,
    pub toll_charges: Decimal,
    pub other_charges: Decimal,
    pub notes: Option<String>,
    pub tripsheet_status: TripsheetStatus,
    pub created_at: DateTime<Utc>,
}

/// Request para crear una nueva hoja de viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripsheetRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,

    #[validate(length(min = 2, max = 150))]
    pub customer_name: String,

    #[validate(length(min = 2, max = 150))]
    pub origin: String,

    #[validate(length(min = 2, max = 150))]
    pub destination: String,

    pub start_date: NaiveDate,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub opening_km: Decimal,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub driver_advance: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub toll_charges: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub other_charges: Option<Decimal>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request para actualizar una hoja de viaje abierta
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTripsheetRequest {
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,

    #[validate(length(min = 2, max = 150))]
    pub customer_name: Option<String>,

    #[validate(length(min = 2, max = 150))]
    pub origin: Option<String>,

    #[validate(length(min = 2, max = 150))]
    pub destination: Option<String>,

    pub start_date: Option<NaiveDate>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub opening_km: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub driver_advance: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub toll_charges: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub other_charges: Option<Decimal>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request para cerrar una hoja de viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CloseTripsheetRequest {
    pub end_date: NaiveDate,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub closing_km: Decimal,
}

/// Response de hoja de viaje para la API
#[derive(Debug, Serialize)]
pub struct TripsheetResponse {
    pub id: Uuid,
    pub serial: String,
    pub vehicle_id: Uuid,
    pub vehicle_registration: Option<String>,
    pub driver_id: Uuid,
    pub driver_name: Option<String>,
    pub customer_name: String,
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub opening_km: Decimal,
    pub closing_km: Option<Decimal>,
    pub total_km: Option<Decimal>,
    pub driver_advance: Decimal,
    pub toll_charges: Decimal,
    pub other_charges: Decimal,
    pub notes: Option<String>,
    pub tripsheet_status: TripsheetStatus,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de hojas de viaje
#[derive(Debug, Deserialize)]
pub struct TripsheetFilters {
    pub tripsheet_status: Option<TripsheetStatus>,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub start_after: Option<NaiveDate>,
    pub start_before: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<Tripsheet> for TripsheetResponse {
    fn from(ts: Tripsheet) -> Self {
        Self {
            id: ts.id,
            serial: ts.serial,
            vehicle_id: ts.vehicle_id,
            vehicle_registration: None,
            driver_id: ts.driver_id,
            driver_name: None,
            customer_name: ts.customer_name,
            origin: ts.origin,
            destination: ts.destination,
            start_date: ts.start_date,
            end_date: ts.end_date,
            opening_km: ts.opening_km,
            closing_km: ts.closing_km,
            total_km: ts.total_km,
            driver_advance: ts.driver_advance,
            toll_charges: ts.toll_charges,
            other_charges: ts.other_charges,
            notes: ts.notes,
            tripsheet_status: ts.tripsheet_status,
            created_at: ts.created_at,
        }
    }
}

impl From<TripsheetWithRefs> for TripsheetResponse {
    fn from(ts: TripsheetWithRefs) -> Self {
        Self {
            id: ts.id,
            serial: ts.serial,
            vehicle_id: ts.vehicle_id,
            vehicle_registration: Some(ts.vehicle_registration),
            driver_id: ts.driver_id,
            driver_name: Some(ts.driver_name),
            customer_name: ts.customer_name,
            origin: ts.origin,
            destination: ts.destination,
            start_date: ts.start_date,
            end_date: ts.end_date,
            opening_km: ts.opening_km,
            closing_km: ts.closing_km,
            total_km: ts.total_km,
            driver_advance: ts.driver_advance,
            toll_charges: ts.toll_charges,
            other_charges: ts.other_charges,
            notes: ts.notes,
            tripsheet_status: ts.tripsheet_status,
            created_at: ts.created_at,
        }
    }
}
