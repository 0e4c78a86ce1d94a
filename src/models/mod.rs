//! Modelos de dominio
//!
//! Cada módulo contiene el struct de la entidad, sus enums de estado
//! y las variantes Request/Response para las operaciones CRUD.

pub mod advance_salary;
pub mod billing;
pub mod driver_salary;
pub mod session;
pub mod settings;
pub mod tripsheet;
pub mod user;
pub mod vehicle;
pub mod vehicle_loan;
pub mod vehicle_service;
pub mod vehicle_type;

use serde::{Deserialize, Serialize};

/// Estado de pago - mapea al ENUM payment_status
///
/// Transiciones lineales: pending -> approved -> paid,
/// con rejected alcanzable solo desde pending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Paid,
    Rejected,
}

impl PaymentStatus {
    /// Verificar si la transición de estado es válida
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Approved)
                | (PaymentStatus::Pending, PaymentStatus::Rejected)
                | (PaymentStatus::Approved, PaymentStatus::Paid)
        )
    }
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_linear_transitions() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Approved));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Rejected));
        assert!(PaymentStatus::Approved.can_transition_to(PaymentStatus::Paid));

        assert!(!PaymentStatus::Approved.can_transition_to(PaymentStatus::Rejected));
        assert!(!PaymentStatus::Paid.can_transition_to(PaymentStatus::Approved));
        assert!(!PaymentStatus::Rejected.can_transition_to(PaymentStatus::Approved));
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Paid));
    }
}
