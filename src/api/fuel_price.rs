//! Handler de precio de combustible
//!
//! El respaldo y la URL de la API se leen de settings, con la
//! configuración del entorno como segundo respaldo.

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    models::settings::Settings,
    services::fuel_price::{quote, FuelPriceQuote},
    state::AppState,
    utils::errors::AppResult,
};

/// GET /api/admin/fuel-price - Precio de combustible vigente
pub async fn get_fuel_price(State(state): State<AppState>) -> AppResult<Json<FuelPriceQuote>> {
    let settings = sqlx::query_as::<_, Settings>("SELECT * FROM settings LIMIT 1")
        .fetch_optional(&state.pool)
        .await?;

    let (fallback, api_url) = match settings {
        Some(s) => (
            s.fuel_price_fallback,
            s.fuel_price_api_url.or_else(|| state.config.fuel_price_api_url.clone()),
        ),
        None => (
            state.config.fuel_price_fallback,
            state.config.fuel_price_api_url.clone(),
        ),
    };

    let fuel_quote = quote(&state, fallback, api_url).await;

    Ok(Json(fuel_quote))
}

/// Crear el router de precio de combustible
pub fn create_fuel_price_router() -> Router<AppState> {
    Router::new().route("/", get(get_fuel_price))
}
