//! Modelo de Settings
//!
//! Fila única con los datos de la empresa y los valores por defecto
//! de facturación.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Settings - mapea exactamente a la tabla settings (fila única)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Settings {
    pub id: Uuid,
    pub company_name: String,
    pub company_address: Option<String>,
    pub company_phone: Option<String>,
    pub company_email: Option<String>,
    pub gst_number: Option<String>,
    pub default_tax_percent: Decimal,
    pub fuel_price_fallback: Decimal,
    pub fuel_price_api_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Request para actualizar la configuración
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 2, max = 150))]
    pub company_name: Option<String>,

    #[validate(length(max = 300))]
    pub company_address: Option<String>,

    #[validate(length(min = 10, max = 15))]
    pub company_phone: Option<String>,

    #[validate(email)]
    pub company_email: Option<String>,

    #[validate(length(min = 15, max = 15))]
    pub gst_number: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub default_tax_percent: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub fuel_price_fallback: Option<Decimal>,

    #[validate(url)]
    pub fuel_price_api_url: Option<String>,
}

/// Response de configuración para la API
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub company_name: String,
    pub company_address: Option<String>,
    pub company_phone: Option<String>,
    pub company_email: Option<String>,
    pub gst_number: Option<String>,
    pub default_tax_percent: Decimal,
    pub fuel_price_fallback: Decimal,
    pub fuel_price_api_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Settings> for SettingsResponse {
    fn from(s: Settings) -> Self {
        Self {
            company_name: s.company_name,
            company_address: s.company_address,
            company_phone: s.company_phone,
            company_email: s.company_email,
            gst_number: s.gst_number,
            default_tax_percent: s.default_tax_percent,
            fuel_price_fallback: s.fuel_price_fallback,
            fuel_price_api_url: s.fuel_price_api_url,
            updated_at: s.updated_at,
        }
    }
}
