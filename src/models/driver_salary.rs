//! Modelo de DriverSalary
//!
//! Nómina mensual de conductores, con deducción de anticipos aprobados.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::PaymentStatus;

/// DriverSalary - mapea exactamente a la tabla driver_salaries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverSalary {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub base_salary: Decimal,
    pub bata_amount: Decimal,
    pub deductions: Decimal,
    pub advance_deducted: Decimal,
    pub net_salary: Decimal,
    pub payment_status: PaymentStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DriverSalary con el nombre del conductor resuelto
#[derive(Debug, Clone, FromRow)]
pub struct DriverSalaryWithRefs {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub year: i32,
    pub month: i32,
    pub base_salary: Decimal,
    pub bata_amount: Decimal,
    pub deductions: Decimal,
    pub advance_deducted: Decimal,
    pub net_salary: Decimal,
    pub payment_status: PaymentStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request para generar la nómina de un mes
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateSalaryRequest {
    pub driver_id: Uuid,

    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,

    #[validate(custom = "crate::utils::validation::validate_month")]
    pub month: i32,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub deductions: Option<Decimal>,
}

/// Response de nómina para la API
#[derive(Debug, Serialize)]
pub struct DriverSalaryResponse {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub driver_name: Option<String>,
    pub year: i32,
    pub month: i32,
    pub base_salary: Decimal,
    pub bata_amount: Decimal,
    pub deductions: Decimal,
    pub advance_deducted: Decimal,
    pub net_salary: Decimal,
    pub payment_status: PaymentStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de nóminas
#[derive(Debug, Deserialize)]
pub struct DriverSalaryFilters {
    pub driver_id: Option<Uuid>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub payment_status: Option<PaymentStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<DriverSalary> for DriverSalaryResponse {
    fn from(s: DriverSalary) -> Self {
        Self {
            id: s.id,
            driver_id: s.driver_id,
            driver_name: None,
            year: s.year,
            month: s.month,
            base_salary: s.base_salary,
            bata_amount: s.bata_amount,
            deductions: s.deductions,
            advance_deducted: s.advance_deducted,
            net_salary: s.net_salary,
            payment_status: s.payment_status,
            approved_at: s.approved_at,
            paid_at: s.paid_at,
            created_at: s.created_at,
        }
    }
}

impl From<DriverSalaryWithRefs> for DriverSalaryResponse {
    fn from(s: DriverSalaryWithRefs) -> Self {
        Self {
            id: s.id,
            driver_id: s.driver_id,
            driver_name: Some(s.driver_name),
            year: s.year,
            month: s.month,
            base_salary: s.base_salary,
            bata_amount: s.bata_amount,
            deductions: s.deductions,
            advance_deducted: s.advance_deducted,
            net_salary: s.net_salary,
            payment_status: s.payment_status,
            approved_at: s.approved_at,
            paid_at: s.paid_at,
            created_at: s.created_at,
        }
    }
}
