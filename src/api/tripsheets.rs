//! Handlers de Tripsheets
//!
//! Hojas de viaje: alta con serial anual, edición mientras están
//! abiertas, cierre con kilometraje final y baja.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::tripsheet::{
        CloseTripsheetRequest, CreateTripsheetRequest, Tripsheet, TripsheetFilters,
        TripsheetResponse, TripsheetStatus, TripsheetWithRefs, UpdateTripsheetRequest,
    },
    models::ApiResponse,
    services::serial::{next_serial, SerialTable},
    state::AppState,
    utils::errors::{AppError, AppResult},
};

const TRIPSHEET_WITH_REFS_SELECT: &str = r#"
    SELECT
        t.id, t.serial, t.vehicle_id, v.registration_number AS vehicle_registration,
        t.driver_id, u.full_name AS driver_name, t.customer_name, t.origin,
        t.destination, t.start_date, t.end_date, t.opening_km, t.closing_km,
        t.total_km, t.driver_advance, t.toll_charges, t.other_charges, t.notes,
        t.tripsheet_status, t.created_at
    FROM tripsheets t
    JOIN vehicles v ON v.id = t.vehicle_id
    JOIN users u ON u.id = t.driver_id
"#;

/// Verificar que el vehículo y el conductor referenciados existen
async fn check_refs(state: &AppState, vehicle_id: Uuid, driver_id: Uuid) -> AppResult<()> {
    let vehicle_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM vehicles WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(vehicle_id)
    .fetch_one(&state.pool)
    .await?;

    if vehicle_exists == 0 {
        return Err(AppError::BadRequest("El vehículo no existe".to_string()));
    }

    let driver_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE id = $1 AND user_role = 'driver' AND deleted_at IS NULL",
    )
    .bind(driver_id)
    .fetch_one(&state.pool)
    .await?;

    if driver_exists == 0 {
        return Err(AppError::BadRequest("El conductor no existe".to_string()));
    }

    Ok(())
}

/// GET /api/admin/tripsheets - Listar hojas de viaje con filtros
pub async fn list_tripsheets(
    State(state): State<AppState>,
    Query(filters): Query<TripsheetFilters>,
) -> AppResult<Json<Vec<TripsheetResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let sql = format!(
        r#"{}
        WHERE ($1::tripsheet_status IS NULL OR t.tripsheet_status = $1)
        AND ($2::uuid IS NULL OR t.vehicle_id = $2)
        AND ($3::uuid IS NULL OR t.driver_id = $3)
        AND ($4::date IS NULL OR t.start_date >= $4)
        AND ($5::date IS NULL OR t.start_date <= $5)
        ORDER BY t.created_at DESC
        LIMIT $6 OFFSET $7
        "#,
        TRIPSHEET_WITH_REFS_SELECT
    );

    let tripsheets = sqlx::query_as::<_, TripsheetWithRefs>(&sql)
        .bind(filters.tripsheet_status)
        .bind(filters.vehicle_id)
        .bind(filters.driver_id)
        .bind(filters.start_after)
        .bind(filters.start_before)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(tripsheets.into_iter().map(TripsheetResponse::from).collect()))
}

/// GET /api/admin/tripsheets/:id - Obtener una hoja de viaje
pub async fn get_tripsheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TripsheetResponse>> {
    let sql = format!("{} WHERE t.id = $1", TRIPSHEET_WITH_REFS_SELECT);

    let tripsheet = sqlx::query_as::<_, TripsheetWithRefs>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Hoja de viaje no encontrada".to_string()))?;

    Ok(Json(TripsheetResponse::from(tripsheet)))
}

/// POST /api/admin/tripsheets - Crear una hoja de viaje
pub async fn create_tripsheet(
    State(state): State<AppState>,
    Json(tripsheet_data): Json<CreateTripsheetRequest>,
) -> AppResult<Json<ApiResponse<TripsheetResponse>>> {
    tripsheet_data.validate().map_err(AppError::Validation)?;
    check_refs(&state, tripsheet_data.vehicle_id, tripsheet_data.driver_id).await?;

    let serial = next_serial(&state.pool, SerialTable::Tripsheets).await?;

    let tripsheet = sqlx::query_as::<_, Tripsheet>(
        r#"
        INSERT INTO tripsheets (
            id, serial, vehicle_id, driver_id, customer_name, origin, destination,
            start_date, opening_km, driver_advance, toll_charges, other_charges,
            notes, tripsheet_status, created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'open', NOW(), NOW()
        )
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&serial)
    .bind(tripsheet_data.vehicle_id)
    .bind(tripsheet_data.driver_id)
    .bind(&tripsheet_data.customer_name)
    .bind(&tripsheet_data.origin)
    .bind(&tripsheet_data.destination)
    .bind(tripsheet_data.start_date)
    .bind(tripsheet_data.opening_km)
    .bind(tripsheet_data.driver_advance.unwrap_or(Decimal::ZERO))
    .bind(tripsheet_data.toll_charges.unwrap_or(Decimal::ZERO))
    .bind(tripsheet_data.other_charges.unwrap_or(Decimal::ZERO))
    .bind(&tripsheet_data.notes)
    .fetch_one(&state.pool)
    .await?;

    log::info!("📝 Hoja de viaje {} creada", tripsheet.serial);

    Ok(Json(ApiResponse::success_with_message(
        TripsheetResponse::from(tripsheet),
        "Hoja de viaje creada exitosamente".to_string(),
    )))
}

/// PUT /api/admin/tripsheets/:id - Actualizar una hoja de viaje abierta
pub async fn update_tripsheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(tripsheet_data): Json<UpdateTripsheetRequest>,
) -> AppResult<Json<ApiResponse<TripsheetResponse>>> {
    tripsheet_data.validate().map_err(AppError::Validation)?;

    let existing = sqlx::query_as::<_, Tripsheet>("SELECT * FROM tripsheets WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Hoja de viaje no encontrada".to_string()))?;

    if existing.tripsheet_status != TripsheetStatus::Open {
        return Err(AppError::Conflict(
            "Solo se pueden editar hojas de viaje abiertas".to_string(),
        ));
    }

    let vehicle_id = tripsheet_data.vehicle_id.unwrap_or(existing.vehicle_id);
    let driver_id = tripsheet_data.driver_id.unwrap_or(existing.driver_id);
    check_refs(&state, vehicle_id, driver_id).await?;

    let tripsheet = sqlx::query_as::<_, Tripsheet>(
        r#"
        UPDATE tripsheets SET
            vehicle_id = COALESCE($2, vehicle_id),
            driver_id = COALESCE($3, driver_id),
            customer_name = COALESCE($4, customer_name),
            origin = COALESCE($5, origin),
            destination = COALESCE($6, destination),
            start_date = COALESCE($7, start_date),
            opening_km = COALESCE($8, opening_km),
            driver_advance = COALESCE($9, driver_advance),
            toll_charges = COALESCE($10, toll_charges),
            other_charges = COALESCE($11, other_charges),
            notes = COALESCE($12, notes),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(tripsheet_data.vehicle_id)
    .bind(tripsheet_data.driver_id)
    .bind(tripsheet_data.customer_name)
    .bind(tripsheet_data.origin)
    .bind(tripsheet_data.destination)
    .bind(tripsheet_data.start_date)
    .bind(tripsheet_data.opening_km)
    .bind(tripsheet_data.driver_advance)
    .bind(tripsheet_data.toll_charges)
    .bind(tripsheet_data.other_charges)
    .bind(tripsheet_data.notes)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        TripsheetResponse::from(tripsheet),
        "Hoja de viaje actualizada exitosamente".to_string(),
    )))
}

/// POST /api/admin/tripsheets/:id/close - Cerrar una hoja de viaje
///
/// Estampa fecha y kilometraje final, calcula total_km y pasa el
/// estado de open a closed. El odómetro del vehículo avanza al
/// kilometraje de cierre si es mayor.
pub async fn close_tripsheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(close_data): Json<CloseTripsheetRequest>,
) -> AppResult<Json<ApiResponse<TripsheetResponse>>> {
    close_data.validate().map_err(AppError::Validation)?;

    let existing = sqlx::query_as::<_, Tripsheet>("SELECT * FROM tripsheets WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Hoja de viaje no encontrada".to_string()))?;

    if existing.tripsheet_status != TripsheetStatus::Open {
        return Err(AppError::Conflict("La hoja de viaje ya está cerrada".to_string()));
    }

    if close_data.end_date < existing.start_date {
        return Err(AppError::BadRequest(
            "La fecha de fin no puede ser anterior a la de inicio".to_string(),
        ));
    }

    if close_data.closing_km < existing.opening_km {
        return Err(AppError::BadRequest(
            "El kilometraje de cierre no puede ser menor que el de apertura".to_string(),
        ));
    }

    let total_km = close_data.closing_km - existing.opening_km;

    let mut tx = state.pool.begin().await?;

    let tripsheet = sqlx::query_as::<_, Tripsheet>(
        r#"
        UPDATE tripsheets SET
            end_date = $2,
            closing_km = $3,
            total_km = $4,
            tripsheet_status = 'closed',
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(close_data.end_date)
    .bind(close_data.closing_km)
    .bind(total_km)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE vehicles
        SET current_odometer = GREATEST(current_odometer, $2), updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(tripsheet.vehicle_id)
    .bind(close_data.closing_km)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    log::info!("🏁 Hoja de viaje {} cerrada ({} km)", tripsheet.serial, total_km);

    Ok(Json(ApiResponse::success_with_message(
        TripsheetResponse::from(tripsheet),
        "Hoja de viaje cerrada exitosamente".to_string(),
    )))
}

/// DELETE /api/admin/tripsheets/:id - Eliminar una hoja de viaje abierta
pub async fn delete_tripsheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = sqlx::query("DELETE FROM tripsheets WHERE id = $1 AND tripsheet_status = 'open'")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Hoja de viaje no encontrada o ya cerrada".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Crear el router de hojas de viaje
pub fn create_tripsheets_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tripsheets))
        .route("/", post(create_tripsheet))
        .route("/:id", get(get_tripsheet))
        .route("/:id", put(update_tripsheet))
        .route("/:id", delete(delete_tripsheet))
        .route("/:id/close", post(close_tripsheet))
}
