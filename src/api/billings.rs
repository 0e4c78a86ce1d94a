//! Handlers de Billings
//!
//! Generación de facturas a partir de hojas de viaje cerradas,
//! consulta y registro de pago.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::billing::{
        Billing, BillingFilters, BillingResponse, BillingWithRefs, GenerateBillingRequest,
    },
    models::settings::Settings,
    models::tripsheet::{Tripsheet, TripsheetStatus},
    models::vehicle_type::VehicleType,
    models::{ApiResponse, PaymentStatus},
    services::billing::{calculate_billing, BillingInput},
    services::serial::{next_serial, SerialTable},
    state::AppState,
    utils::errors::{AppError, AppResult},
};

const BILLING_WITH_REFS_SELECT: &str = r#"
    SELECT
        b.id, b.serial, b.tripsheet_id, t.serial AS tripsheet_serial, t.customer_name,
        b.rate_per_km, b.minimum_km_per_day, b.driver_bata_per_day, b.billed_km,
        b.base_amount, b.bata_amount, b.toll_charges, b.other_charges, b.subtotal,
        b.tax_percent, b.tax_amount, b.total_amount, b.amount_in_words,
        b.payment_status, b.paid_at, b.created_at
    FROM billings b
    JOIN tripsheets t ON t.id = b.tripsheet_id
"#;

/// GET /api/admin/billings - Listar facturas con filtros
pub async fn list_billings(
    State(state): State<AppState>,
    Query(filters): Query<BillingFilters>,
) -> AppResult<Json<Vec<BillingResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let sql = format!(
        r#"{}
        WHERE ($1::payment_status IS NULL OR b.payment_status = $1)
        AND ($2::uuid IS NULL OR b.tripsheet_id = $2)
        ORDER BY b.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
        BILLING_WITH_REFS_SELECT
    );

    let billings = sqlx::query_as::<_, BillingWithRefs>(&sql)
        .bind(filters.payment_status)
        .bind(filters.tripsheet_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(billings.into_iter().map(BillingResponse::from).collect()))
}

/// GET /api/admin/billings/:id - Obtener una factura
pub async fn get_billing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BillingResponse>> {
    let sql = format!("{} WHERE b.id = $1", BILLING_WITH_REFS_SELECT);

    let billing = sqlx::query_as::<_, BillingWithRefs>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Factura no encontrada".to_string()))?;

    Ok(Json(BillingResponse::from(billing)))
}

/// POST /api/admin/billings/generate/:tripsheet_id - Generar factura
///
/// Corre el cálculo de facturación sobre una hoja cerrada: tarifas del
/// tipo de vehículo (con overrides opcionales), IVA por defecto de
/// settings y serial INV anual. La hoja pasa a estado billed.
pub async fn generate_billing(
    State(state): State<AppState>,
    Path(tripsheet_id): Path<Uuid>,
    body: Option<Json<GenerateBillingRequest>>,
) -> AppResult<Json<ApiResponse<BillingResponse>>> {
    let overrides = body.map(|Json(b)| b).unwrap_or_default();
    overrides.validate().map_err(AppError::Validation)?;

    let tripsheet = sqlx::query_as::<_, Tripsheet>("SELECT * FROM tripsheets WHERE id = $1")
        .bind(tripsheet_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Hoja de viaje no encontrada".to_string()))?;

    match tripsheet.tripsheet_status {
        TripsheetStatus::Closed => {}
        TripsheetStatus::Open => {
            return Err(AppError::Conflict(
                "La hoja de viaje debe cerrarse antes de facturar".to_string(),
            ));
        }
        TripsheetStatus::Billed => {
            return Err(AppError::Conflict("La hoja de viaje ya está facturada".to_string()));
        }
    }

    let (end_date, total_km) = match (tripsheet.end_date, tripsheet.total_km) {
        (Some(end_date), Some(total_km)) => (end_date, total_km),
        _ => {
            return Err(AppError::Internal(
                "Hoja cerrada sin fecha de fin o kilometraje total".to_string(),
            ));
        }
    };

    let vehicle_type = sqlx::query_as::<_, VehicleType>(
        r#"
        SELECT vt.* FROM vehicle_types vt
        JOIN vehicles v ON v.vehicle_type_id = vt.id
        WHERE v.id = $1
        "#,
    )
    .bind(tripsheet.vehicle_id)
    .fetch_one(&state.pool)
    .await?;

    let settings = sqlx::query_as::<_, Settings>("SELECT * FROM settings LIMIT 1")
        .fetch_optional(&state.pool)
        .await?;
    let default_tax = settings
        .map(|s| s.default_tax_percent)
        .unwrap_or_else(|| rust_decimal::Decimal::from(5));

    let input = BillingInput {
        start_date: tripsheet.start_date,
        end_date,
        total_km,
        rate_per_km: overrides.rate_per_km.unwrap_or(vehicle_type.rate_per_km),
        minimum_km_per_day: vehicle_type.minimum_km_per_day,
        driver_bata_per_day: vehicle_type.driver_bata_per_day,
        toll_charges: tripsheet.toll_charges,
        other_charges: tripsheet.other_charges,
        tax_percent: overrides.tax_percent.unwrap_or(default_tax),
    };

    let breakdown = calculate_billing(&input)?;
    let serial = next_serial(&state.pool, SerialTable::Billings).await?;

    let mut tx = state.pool.begin().await?;

    let billing = sqlx::query_as::<_, Billing>(
        r#"
        INSERT INTO billings (
            id, serial, tripsheet_id, rate_per_km, minimum_km_per_day,
            driver_bata_per_day, billed_km, base_amount, bata_amount, toll_charges,
            other_charges, subtotal, tax_percent, tax_amount, total_amount,
            amount_in_words, payment_status, created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
            'pending', NOW(), NOW()
        )
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&serial)
    .bind(tripsheet.id)
    .bind(input.rate_per_km)
    .bind(input.minimum_km_per_day)
    .bind(input.driver_bata_per_day)
    .bind(breakdown.billed_km)
    .bind(breakdown.base_amount)
    .bind(breakdown.bata_amount)
    .bind(input.toll_charges)
    .bind(input.other_charges)
    .bind(breakdown.subtotal)
    .bind(input.tax_percent)
    .bind(breakdown.tax_amount)
    .bind(breakdown.total_amount)
    .bind(&breakdown.amount_in_words)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE tripsheets SET tripsheet_status = 'billed', updated_at = NOW() WHERE id = $1",
    )
    .bind(tripsheet.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    log::info!(
        "🧾 Factura {} generada para hoja {} (total {})",
        billing.serial,
        tripsheet.serial,
        billing.total_amount
    );

    Ok(Json(ApiResponse::success_with_message(
        BillingResponse::from(billing),
        "Factura generada exitosamente".to_string(),
    )))
}

/// POST /api/admin/billings/:id/approve - Aprobar una factura pendiente
pub async fn approve_billing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BillingResponse>>> {
    let billing = sqlx::query_as::<_, Billing>("SELECT * FROM billings WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Factura no encontrada".to_string()))?;

    if !billing.payment_status.can_transition_to(PaymentStatus::Approved) {
        return Err(AppError::Conflict(
            "Solo se pueden aprobar facturas pendientes".to_string(),
        ));
    }

    let billing = sqlx::query_as::<_, Billing>(
        "UPDATE billings SET payment_status = 'approved', updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        BillingResponse::from(billing),
        "Factura aprobada".to_string(),
    )))
}

/// POST /api/admin/billings/:id/pay - Registrar el pago de una factura
pub async fn pay_billing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BillingResponse>>> {
    let billing = sqlx::query_as::<_, Billing>("SELECT * FROM billings WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Factura no encontrada".to_string()))?;

    if !billing.payment_status.can_transition_to(PaymentStatus::Paid) {
        return Err(AppError::Conflict(
            "Solo se pueden pagar facturas aprobadas".to_string(),
        ));
    }

    let billing = sqlx::query_as::<_, Billing>(
        r#"
        UPDATE billings
        SET payment_status = 'paid', paid_at = NOW(), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    log::info!("💰 Factura {} pagada", billing.serial);

    Ok(Json(ApiResponse::success_with_message(
        BillingResponse::from(billing),
        "Pago registrado exitosamente".to_string(),
    )))
}

/// DELETE /api/admin/billings/:id - Eliminar una factura pendiente
///
/// La hoja de viaje vuelve a estado closed para poder refacturar.
pub async fn delete_billing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let billing = sqlx::query_as::<_, Billing>("SELECT * FROM billings WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Factura no encontrada".to_string()))?;

    if billing.payment_status != PaymentStatus::Pending {
        return Err(AppError::Conflict(
            "Solo se pueden eliminar facturas pendientes".to_string(),
        ));
    }

    let mut tx = state.pool.begin().await?;

    sqlx::query("DELETE FROM billings WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "UPDATE tripsheets SET tripsheet_status = 'closed', updated_at = NOW() WHERE id = $1",
    )
    .bind(billing.tripsheet_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Crear el router de facturas
pub fn create_billings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_billings))
        .route("/:id", get(get_billing))
        .route("/generate/:tripsheet_id", post(generate_billing))
        .route("/:id/approve", post(approve_billing))
        .route("/:id/pay", post(pay_billing))
        .route("/:id", delete(delete_billing))
}
