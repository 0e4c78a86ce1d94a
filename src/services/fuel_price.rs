//! Consulta de precio de combustible
//!
//! Consulta best-effort a la API externa configurada, con cache en
//! memoria por timestamp y precio de respaldo si la consulta falla.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::state::AppState;

/// Origen del precio devuelto
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FuelPriceSource {
    Live,
    Cache,
    Fallback,
}

/// Precio de combustible con su procedencia
#[derive(Debug, Serialize)]
pub struct FuelPriceQuote {
    pub price: Decimal,
    pub source: FuelPriceSource,
    pub fetched_at: DateTime<Utc>,
}

/// Proveedor externo de precio de combustible
#[async_trait]
pub trait FuelPriceProvider: Send + Sync {
    async fn fetch_price(&self) -> anyhow::Result<Decimal>;
}

/// Proveedor HTTP contra la API configurada
pub struct HttpFuelPriceProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpFuelPriceProvider {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl FuelPriceProvider for HttpFuelPriceProvider {
    async fn fetch_price(&self) -> anyhow::Result<Decimal> {
        log::info!("⛽ Consultando precio de combustible: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .timeout(std::time::Duration::from_secs(10))
            .header("User-Agent", "FleetBackoffice/1.0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("fuel price API returned status {}", status);
        }

        let payload: serde_json::Value = response.json().await?;
        parse_price_payload(&payload)
    }
}

/// Extraer el precio del payload JSON de la API externa.
///
/// Acepta `{"price": 102.3}` tanto con número como con string, y el
/// alias `fuel_price` que usan algunos proveedores.
pub fn parse_price_payload(payload: &serde_json::Value) -> anyhow::Result<Decimal> {
    let value = payload
        .get("price")
        .or_else(|| payload.get("fuel_price"))
        .ok_or_else(|| anyhow::anyhow!("missing 'price' field in fuel price payload"))?;

    let price = match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .and_then(Decimal::from_f64)
            .ok_or_else(|| anyhow::anyhow!("price is not a valid number"))?,
        serde_json::Value::String(s) => s
            .parse::<Decimal>()
            .map_err(|_| anyhow::anyhow!("price string is not a valid decimal"))?,
        _ => anyhow::bail!("unexpected type for price field"),
    };

    if price <= Decimal::ZERO {
        anyhow::bail!("fuel price must be positive");
    }
    Ok(price.round_dp(2))
}

/// Consultar el proveedor y degradar al precio de respaldo ante fallo
pub async fn fetch_or_fallback(
    provider: Option<&dyn FuelPriceProvider>,
    fallback: Decimal,
) -> (Decimal, FuelPriceSource) {
    match provider {
        Some(p) => match p.fetch_price().await {
            Ok(price) => (price, FuelPriceSource::Live),
            Err(e) => {
                log::warn!("⚠️ Consulta de precio de combustible falló: {}", e);
                (fallback, FuelPriceSource::Fallback)
            }
        },
        None => {
            log::info!("ℹ️ Sin API de precio de combustible configurada, usando respaldo");
            (fallback, FuelPriceSource::Fallback)
        }
    }
}

/// Obtener el precio de combustible: cache → API externa → respaldo.
/// Solo los precios en vivo alimentan el cache.
pub async fn quote(state: &AppState, fallback: Decimal, api_url: Option<String>) -> FuelPriceQuote {
    if let Some(cached) = state.cached_fuel_price().await {
        return FuelPriceQuote {
            price: cached.price,
            source: FuelPriceSource::Cache,
            fetched_at: cached.fetched_at,
        };
    }

    let provider = api_url
        .map(|url| HttpFuelPriceProvider::new(state.http_client.clone(), url));
    let (price, source) = fetch_or_fallback(
        provider.as_ref().map(|p| p as &dyn FuelPriceProvider),
        fallback,
    )
    .await;

    if source == FuelPriceSource::Live {
        state.store_fuel_price(price).await;
    }

    FuelPriceQuote {
        price,
        source,
        fetched_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingProvider;

    #[async_trait]
    impl FuelPriceProvider for FailingProvider {
        async fn fetch_price(&self) -> anyhow::Result<Decimal> {
            anyhow::bail!("connection refused")
        }
    }

    struct FixedProvider(Decimal);

    #[async_trait]
    impl FuelPriceProvider for FixedProvider {
        async fn fetch_price(&self) -> anyhow::Result<Decimal> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_parse_price_payload_variants() {
        assert_eq!(
            parse_price_payload(&json!({"price": 102.3})).unwrap(),
            Decimal::new(1023, 1)
        );
        assert_eq!(
            parse_price_payload(&json!({"price": "99.87"})).unwrap(),
            Decimal::new(9987, 2)
        );
        assert_eq!(
            parse_price_payload(&json!({"fuel_price": 95})).unwrap(),
            Decimal::from(95)
        );
        assert!(parse_price_payload(&json!({"cost": 95})).is_err());
        assert!(parse_price_payload(&json!({"price": -1})).is_err());
        assert!(parse_price_payload(&json!({"price": null})).is_err());
    }

    #[tokio::test]
    async fn test_fetch_or_fallback_on_failure() {
        let fallback = Decimal::new(10250, 2);
        let (price, source) = fetch_or_fallback(Some(&FailingProvider), fallback).await;
        assert_eq!(price, fallback);
        assert_eq!(source, FuelPriceSource::Fallback);
    }

    #[tokio::test]
    async fn test_fetch_or_fallback_live() {
        let live = Decimal::new(9800, 2);
        let (price, source) = fetch_or_fallback(Some(&FixedProvider(live)), Decimal::ONE).await;
        assert_eq!(price, live);
        assert_eq!(source, FuelPriceSource::Live);
    }

    #[tokio::test]
    async fn test_fetch_or_fallback_without_provider() {
        let fallback = Decimal::new(10250, 2);
        let (price, source) = fetch_or_fallback(None, fallback).await;
        assert_eq!(price, fallback);
        assert_eq!(source, FuelPriceSource::Fallback);
    }
}
