//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::config::environment::EnvironmentConfig;

/// Precio de combustible cacheado en memoria con su timestamp
#[derive(Clone, Debug)]
pub struct CachedFuelPrice {
    pub price: Decimal,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CachedFuelPrice {
    pub fn new(price: Decimal, ttl_secs: u64) -> Self {
        let now = Utc::now();
        Self {
            price,
            fetched_at: now,
            expires_at: now + Duration::seconds(ttl_secs as i64),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub http_client: Client,
    pub fuel_cache: Arc<RwLock<Option<CachedFuelPrice>>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            http_client: Client::new(),
            fuel_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Obtener el precio cacheado si sigue vigente
    pub async fn cached_fuel_price(&self) -> Option<CachedFuelPrice> {
        let cache = self.fuel_cache.read().await;
        match cache.as_ref() {
            Some(entry) if !entry.is_expired() => {
                log::info!("✅ Precio de combustible servido desde cache ({})", entry.fetched_at);
                Some(entry.clone())
            }
            Some(_) => {
                log::info!("⏰ Cache de precio de combustible expirado");
                None
            }
            None => None,
        }
    }

    /// Almacenar el precio de combustible en cache
    pub async fn store_fuel_price(&self, price: Decimal) {
        let entry = CachedFuelPrice::new(price, self.config.fuel_price_cache_ttl);
        let mut cache = self.fuel_cache.write().await;
        *cache = Some(entry);
        log::info!("💾 Precio de combustible cacheado: {}", price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_fuel_price_expiry() {
        let fresh = CachedFuelPrice::new(Decimal::new(10250, 2), 3600);
        assert!(!fresh.is_expired());

        let stale = CachedFuelPrice {
            price: Decimal::new(10250, 2),
            fetched_at: Utc::now() - Duration::hours(2),
            expires_at: Utc::now() - Duration::hours(1),
        };
        assert!(stale.is_expired());
    }
}
