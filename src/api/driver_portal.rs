//! Portal del conductor
//!
//! Endpoints de solo-lectura sobre los datos propios del conductor
//! autenticado, más la solicitud de anticipos. El driver_id sale
//! siempre de la sesión, nunca del request.

use axum::{
    extract::{Extension, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::advance_salary::{
        AdvanceSalary, AdvanceSalaryResponse, RequestAdvanceRequest,
    },
    models::driver_salary::{DriverSalaryResponse, DriverSalaryWithRefs},
    models::tripsheet::{TripsheetResponse, TripsheetWithRefs},
    models::ApiResponse,
    state::AppState,
    utils::errors::{AppError, AppResult},
};

#[derive(Debug, serde::Deserialize)]
pub struct PortalFilters {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/driver/tripsheets - Hojas de viaje del conductor autenticado
pub async fn my_tripsheets(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(filters): Query<PortalFilters>,
) -> AppResult<Json<Vec<TripsheetResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let tripsheets = sqlx::query_as::<_, TripsheetWithRefs>(
        r#"
        SELECT
            t.id, t.serial, t.vehicle_id, v.registration_number AS vehicle_registration,
            t.driver_id, u.full_name AS driver_name, t.customer_name, t.origin,
            t.destination, t.start_date, t.end_date, t.opening_km, t.closing_km,
            t.total_km, t.driver_advance, t.toll_charges, t.other_charges, t.notes,
            t.tripsheet_status, t.created_at
        FROM tripsheets t
        JOIN vehicles v ON v.id = t.vehicle_id
        JOIN users u ON u.id = t.driver_id
        WHERE t.driver_id = $1
        ORDER BY t.start_date DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(auth.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(tripsheets.into_iter().map(TripsheetResponse::from).collect()))
}

/// GET /api/driver/salaries - Nóminas del conductor autenticado
pub async fn my_salaries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(filters): Query<PortalFilters>,
) -> AppResult<Json<Vec<DriverSalaryResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let salaries = sqlx::query_as::<_, DriverSalaryWithRefs>(
        r#"
        SELECT
            s.id, s.driver_id, u.full_name AS driver_name, s.year, s.month,
            s.base_salary, s.bata_amount, s.deductions, s.advance_deducted,
            s.net_salary, s.payment_status, s.approved_at, s.paid_at, s.created_at
        FROM driver_salaries s
        JOIN users u ON u.id = s.driver_id
        WHERE s.driver_id = $1
        ORDER BY s.year DESC, s.month DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(auth.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(salaries.into_iter().map(DriverSalaryResponse::from).collect()))
}

/// GET /api/driver/advances - Anticipos del conductor autenticado
pub async fn my_advances(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(filters): Query<PortalFilters>,
) -> AppResult<Json<Vec<AdvanceSalaryResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let advances = sqlx::query_as::<_, AdvanceSalary>(
        r#"
        SELECT * FROM advance_salaries
        WHERE driver_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(auth.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(advances.into_iter().map(AdvanceSalaryResponse::from).collect()))
}

/// POST /api/driver/advances - Solicitar un anticipo
///
/// Queda en estado pending hasta que administración lo apruebe.
pub async fn request_advance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<RequestAdvanceRequest>,
) -> AppResult<Json<ApiResponse<AdvanceSalaryResponse>>> {
    request.validate().map_err(AppError::Validation)?;

    let advance = sqlx::query_as::<_, AdvanceSalary>(
        r#"
        INSERT INTO advance_salaries (
            id, driver_id, amount, reason, payment_status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, 'pending', NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(request.amount)
    .bind(&request.reason)
    .fetch_one(&state.pool)
    .await?;

    log::info!(
        "💸 Conductor {} solicitó anticipo de {}",
        auth.user_id,
        advance.amount
    );

    Ok(Json(ApiResponse::success_with_message(
        AdvanceSalaryResponse::from(advance),
        "Solicitud de anticipo registrada".to_string(),
    )))
}

/// Crear el router del portal del conductor
pub fn create_driver_portal_router() -> Router<AppState> {
    Router::new()
        .route("/tripsheets", get(my_tripsheets))
        .route("/salaries", get(my_salaries))
        .route("/advances", get(my_advances))
        .route("/advances", post(request_advance))
}
