//! Modelo de Billing
//!
//! Facturas generadas a partir de hojas de viaje cerradas.
//! El serial tiene formato INV-YYYY-NNNN.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::PaymentStatus;

/// Billing - mapea exactamente a la tabla billings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Billing {
    pub id: Uuid,
    pub serial: String,
    pub tripsheet_id: Uuid,
    pub rate_per_km: Decimal,
    pub minimum_km_per_day: Decimal,
    pub driver_bata_per_day: Decimal,
    pub billed_km: Decimal,
    pub base_amount: Decimal,
    pub bata_amount: Decimal,
    pub toll_charges: Decimal,
    pub other_charges: Decimal,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub amount_in_words: String,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Billing con el serial de su hoja de viaje resuelto
#[derive(Debug, Clone, FromRow)]
pub struct BillingWithRefs {
    pub id: Uuid,
    pub serial: String,
    pub tripsheet_id: Uuid,
    pub tripsheet_serial: String,
    pub customer_name: String,
    pub rate_per_km: Decimal,
    pub minimum_km_per_day: Decimal,
    pub driver_bata_per_day: Decimal,
    pub billed_km: Decimal,
    pub base_amount: Decimal,
    pub bata_amount: Decimal,
    pub toll_charges: Decimal,
    pub other_charges: Decimal,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub amount_in_words: String,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request para generar la factura de una hoja de viaje
///
/// Los overrides son opcionales: sin body se toman las tarifas del tipo
/// de vehículo y el IVA por defecto de settings.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateBillingRequest {
    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub rate_per_km: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub tax_percent: Option<Decimal>,
}

/// Response de factura para la API
#[derive(Debug, Serialize)]
pub struct BillingResponse {
    pub id: Uuid,
    pub serial: String,
    pub tripsheet_id: Uuid,
    pub tripsheet_serial: Option<String>,
    pub customer_name: Option<String>,
    pub rate_per_km: Decimal,
    pub minimum_km_per_day: Decimal,
    pub driver_bata_per_day: Decimal,
    pub billed_km: Decimal,
    pub base_amount: Decimal,
    pub bata_amount: Decimal,
    pub toll_charges: Decimal,
    pub other_charges: Decimal,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub amount_in_words: String,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de facturas
#[derive(Debug, Deserialize)]
pub struct BillingFilters {
    pub payment_status: Option<PaymentStatus>,
    pub tripsheet_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<Billing> for BillingResponse {
    fn from(b: Billing) -> Self {
        Self {
            id: b.id,
            serial: b.serial,
            tripsheet_id: b.tripsheet_id,
            tripsheet_serial: None,
            customer_name: None,
            rate_per_km: b.rate_per_km,
            minimum_km_per_day: b.minimum_km_per_day,
            driver_bata_per_day: b.driver_bata_per_day,
            billed_km: b.billed_km,
            base_amount: b.base_amount,
            bata_amount: b.bata_amount,
            toll_charges: b.toll_charges,
            other_charges: b.other_charges,
            subtotal: b.subtotal,
            tax_percent: b.tax_percent,
            tax_amount: b.tax_amount,
            total_amount: b.total_amount,
            amount_in_words: b.amount_in_words,
            payment_status: b.payment_status,
            paid_at: b.paid_at,
            created_at: b.created_at,
        }
    }
}

impl From<BillingWithRefs> for BillingResponse {
    fn from(b: BillingWithRefs) -> Self {
        Self {
            id: b.id,
            serial: b.serial,
            tripsheet_id: b.tripsheet_id,
            tripsheet_serial: Some(b.tripsheet_serial),
            customer_name: Some(b.customer_name),
            rate_per_km: b.rate_per_km,
            minimum_km_per_day: b.minimum_km_per_day,
            driver_bata_per_day: b.driver_bata_per_day,
            billed_km: b.billed_km,
            base_amount: b.base_amount,
            bata_amount: b.bata_amount,
            toll_charges: b.toll_charges,
            other_charges: b.other_charges,
            subtotal: b.subtotal,
            tax_percent: b.tax_percent,
            tax_amount: b.tax_amount,
            total_amount: b.total_amount,
            amount_in_words: b.amount_in_words,
            payment_status: b.payment_status,
            paid_at: b.paid_at,
            created_at: b.created_at,
        }
    }
}
