//! Modelo de AdvanceSalary
//!
//! Anticipos de salario solicitados por conductores y aprobados por admin.
//! Un anticipo pagado se descuenta en las nóminas siguientes; el último
//! descuento puede ser parcial, amount_deducted acumula lo descontado.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::PaymentStatus;

/// AdvanceSalary - mapea exactamente a la tabla advance_salaries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdvanceSalary {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub amount: Decimal,
    pub reason: Option<String>,
    pub payment_status: PaymentStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub amount_deducted: Decimal,
    pub deducted_in: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// AdvanceSalary con el nombre del conductor resuelto
#[derive(Debug, Clone, FromRow)]
pub struct AdvanceSalaryWithRefs {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub amount: Decimal,
    pub reason: Option<String>,
    pub payment_status: PaymentStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub amount_deducted: Decimal,
    pub deducted_in: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request para registrar un anticipo (admin indica el conductor)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdvanceRequest {
    pub driver_id: Uuid,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub amount: Decimal,

    #[validate(length(max = 300))]
    pub reason: Option<String>,
}

/// Request para que un conductor solicite su propio anticipo
#[derive(Debug, Deserialize, Validate)]
pub struct RequestAdvanceRequest {
    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub amount: Decimal,

    #[validate(length(max = 300))]
    pub reason: Option<String>,
}

/// Response de anticipo para la API
#[derive(Debug, Serialize)]
pub struct AdvanceSalaryResponse {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub driver_name: Option<String>,
    pub amount: Decimal,
    pub reason: Option<String>,
    pub payment_status: PaymentStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub amount_deducted: Decimal,
    pub deducted_in: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de anticipos
#[derive(Debug, Deserialize)]
pub struct AdvanceSalaryFilters {
    pub driver_id: Option<Uuid>,
    pub payment_status: Option<PaymentStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<AdvanceSalary> for AdvanceSalaryResponse {
    fn from(a: AdvanceSalary) -> Self {
        Self {
            id: a.id,
            driver_id: a.driver_id,
            driver_name: None,
            amount: a.amount,
            reason: a.reason,
            payment_status: a.payment_status,
            approved_at: a.approved_at,
            paid_at: a.paid_at,
            amount_deducted: a.amount_deducted,
            deducted_in: a.deducted_in,
            created_at: a.created_at,
        }
    }
}

impl From<AdvanceSalaryWithRefs> for AdvanceSalaryResponse {
    fn from(a: AdvanceSalaryWithRefs) -> Self {
        Self {
            id: a.id,
            driver_id: a.driver_id,
            driver_name: Some(a.driver_name),
            amount: a.amount,
            reason: a.reason,
            payment_status: a.payment_status,
            approved_at: a.approved_at,
            paid_at: a.paid_at,
            amount_deducted: a.amount_deducted,
            deducted_in: a.deducted_in,
            created_at: a.created_at,
        }
    }
}
