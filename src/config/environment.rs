//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use rust_decimal::Decimal;
use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub session_secret: String,
    pub session_expiration: u64,
    pub cors_origins: Vec<String>,
    // Consulta de precio de combustible
    pub fuel_price_api_url: Option<String>,
    pub fuel_price_cache_ttl: u64,
    pub fuel_price_fallback: Decimal,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            session_secret: env::var("SESSION_SECRET").expect("SESSION_SECRET must be set"),
            session_expiration: env::var("SESSION_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("SESSION_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            fuel_price_api_url: env::var("FUEL_PRICE_API_URL").ok(),
            fuel_price_cache_ttl: env::var("FUEL_PRICE_CACHE_TTL")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("FUEL_PRICE_CACHE_TTL must be a valid number"),
            fuel_price_fallback: env::var("FUEL_PRICE_FALLBACK")
                .unwrap_or_else(|_| "102.50".to_string())
                .parse()
                .expect("FUEL_PRICE_FALLBACK must be a valid decimal"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
