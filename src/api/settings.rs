//! Handlers de Settings
//!
//! Configuración de la empresa (fila única).

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use validator::Validate;

use crate::{
    models::settings::{Settings, SettingsResponse, UpdateSettingsRequest},
    models::ApiResponse,
    state::AppState,
    utils::errors::{AppError, AppResult},
};

/// GET /api/admin/settings - Obtener la configuración
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<SettingsResponse>> {
    let settings = sqlx::query_as::<_, Settings>("SELECT * FROM settings LIMIT 1")
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::Internal("La configuración no está inicializada".to_string()))?;

    Ok(Json(SettingsResponse::from(settings)))
}

/// PUT /api/admin/settings - Actualizar la configuración
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings_data): Json<UpdateSettingsRequest>,
) -> AppResult<Json<ApiResponse<SettingsResponse>>> {
    settings_data.validate().map_err(AppError::Validation)?;

    let settings = sqlx::query_as::<_, Settings>(
        r#"
        UPDATE settings SET
            company_name = COALESCE($1, company_name),
            company_address = COALESCE($2, company_address),
            company_phone = COALESCE($3, company_phone),
            company_email = COALESCE($4, company_email),
            gst_number = COALESCE($5, gst_number),
            default_tax_percent = COALESCE($6, default_tax_percent),
            fuel_price_fallback = COALESCE($7, fuel_price_fallback),
            fuel_price_api_url = COALESCE($8, fuel_price_api_url),
            updated_at = NOW()
        WHERE id = (SELECT id FROM settings LIMIT 1)
        RETURNING *
        "#,
    )
    .bind(settings_data.company_name)
    .bind(settings_data.company_address)
    .bind(settings_data.company_phone)
    .bind(settings_data.company_email)
    .bind(settings_data.gst_number)
    .bind(settings_data.default_tax_percent)
    .bind(settings_data.fuel_price_fallback)
    .bind(settings_data.fuel_price_api_url)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Internal("La configuración no está inicializada".to_string()))?;

    log::info!("⚙️ Configuración de empresa actualizada");

    Ok(Json(ApiResponse::success_with_message(
        SettingsResponse::from(settings),
        "Configuración actualizada exitosamente".to_string(),
    )))
}

/// Crear el router de configuración
pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings))
        .route("/", put(update_settings))
}
