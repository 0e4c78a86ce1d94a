//! Modelo de VehicleLoan
//!
//! Préstamos sobre vehículos; el calendario de cuotas (EMI) se calcula
//! bajo demanda y no se persiste.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Estado del préstamo - mapea al ENUM loan_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Closed,
}

/// VehicleLoan - mapea exactamente a la tabla vehicle_loans
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleLoan {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub lender_name: String,
    pub principal_amount: Decimal,
    pub annual_interest_rate: Decimal,
    pub tenure_months: i32,
    pub emi_amount: Decimal,
    pub start_date: NaiveDate,
    pub loan_status: LoanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// VehicleLoan con la matrícula del vehículo resuelta
#[derive(Debug, Clone, FromRow)]
pub struct VehicleLoanWithRefs {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_registration: String,
    pub lender_name: String,
    pub principal_amount: Decimal,
    pub annual_interest_rate: Decimal,
    pub tenure_months: i32,
    pub emi_amount: Decimal,
    pub start_date: NaiveDate,
    pub loan_status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

/// Request para registrar un préstamo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleLoanRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 2, max = 150))]
    pub lender_name: String,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub principal_amount: Decimal,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub annual_interest_rate: Decimal,

    #[validate(range(min = 1, max = 360))]
    pub tenure_months: i32,

    pub start_date: NaiveDate,
}

/// Request para actualizar un préstamo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleLoanRequest {
    #[validate(length(min = 2, max = 150))]
    pub lender_name: Option<String>,

    pub loan_status: Option<LoanStatus>,
}

/// Response de préstamo para la API
#[derive(Debug, Serialize)]
pub struct VehicleLoanResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_registration: Option<String>,
    pub lender_name: String,
    pub principal_amount: Decimal,
    pub annual_interest_rate: Decimal,
    pub tenure_months: i32,
    pub emi_amount: Decimal,
    pub start_date: NaiveDate,
    pub loan_status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de préstamos
#[derive(Debug, Deserialize)]
pub struct VehicleLoanFilters {
    pub vehicle_id: Option<Uuid>,
    pub loan_status: Option<LoanStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<VehicleLoan> for VehicleLoanResponse {
    fn from(l: VehicleLoan) -> Self {
        Self {
            id: l.id,
            vehicle_id: l.vehicle_id,
            vehicle_registration: None,
            lender_name: l.lender_name,
            principal_amount: l.principal_amount,
            annual_interest_rate: l.annual_interest_rate,
            tenure_months: l.tenure_months,
            emi_amount: l.emi_amount,
            start_date: l.start_date,
            loan_status: l.loan_status,
            created_at: l.created_at,
        }
    }
}

impl From<VehicleLoanWithRefs> for VehicleLoanResponse {
    fn from(l: VehicleLoanWithRefs) -> Self {
        Self {
            id: l.id,
            vehicle_id: l.vehicle_id,
            vehicle_registration: Some(l.vehicle_registration),
            lender_name: l.lender_name,
            principal_amount: l.principal_amount,
            annual_interest_rate: l.annual_interest_rate,
            tenure_months: l.tenure_months,
            emi_amount: l.emi_amount,
            start_date: l.start_date,
            loan_status: l.loan_status,
            created_at: l.created_at,
        }
    }
}
