//! Handlers de VehicleLoans
//!
//! Préstamos de vehículos con cuota EMI calculada al crear y tabla de
//! amortización bajo demanda.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::vehicle_loan::{
        CreateVehicleLoanRequest, UpdateVehicleLoanRequest, VehicleLoan, VehicleLoanFilters,
        VehicleLoanResponse, VehicleLoanWithRefs,
    },
    models::ApiResponse,
    services::loan::{build_schedule, calculate_emi, EmiSchedule},
    state::AppState,
    utils::errors::{AppError, AppResult},
};

const LOAN_WITH_REFS_SELECT: &str = r#"
    SELECT
        l.id, l.vehicle_id, v.registration_number AS vehicle_registration,
        l.lender_name, l.principal_amount, l.annual_interest_rate, l.tenure_months,
        l.emi_amount, l.start_date, l.loan_status, l.created_at
    FROM vehicle_loans l
    JOIN vehicles v ON v.id = l.vehicle_id
"#;

/// GET /api/admin/vehicle-loans - Listar préstamos con filtros
pub async fn list_loans(
    State(state): State<AppState>,
    Query(filters): Query<VehicleLoanFilters>,
) -> AppResult<Json<Vec<VehicleLoanResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let sql = format!(
        r#"{}
        WHERE ($1::uuid IS NULL OR l.vehicle_id = $1)
        AND ($2::loan_status IS NULL OR l.loan_status = $2)
        ORDER BY l.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
        LOAN_WITH_REFS_SELECT
    );

    let loans = sqlx::query_as::<_, VehicleLoanWithRefs>(&sql)
        .bind(filters.vehicle_id)
        .bind(filters.loan_status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(loans.into_iter().map(VehicleLoanResponse::from).collect()))
}

/// GET /api/admin/vehicle-loans/:id - Obtener un préstamo
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VehicleLoanResponse>> {
    let sql = format!("{} WHERE l.id = $1", LOAN_WITH_REFS_SELECT);

    let loan = sqlx::query_as::<_, VehicleLoanWithRefs>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Préstamo no encontrado".to_string()))?;

    Ok(Json(VehicleLoanResponse::from(loan)))
}

/// POST /api/admin/vehicle-loans - Registrar un préstamo
///
/// La cuota EMI se calcula al momento del alta y queda fija.
pub async fn create_loan(
    State(state): State<AppState>,
    Json(loan_data): Json<CreateVehicleLoanRequest>,
) -> AppResult<Json<ApiResponse<VehicleLoanResponse>>> {
    loan_data.validate().map_err(AppError::Validation)?;

    let vehicle_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM vehicles WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(loan_data.vehicle_id)
    .fetch_one(&state.pool)
    .await?;

    if vehicle_exists == 0 {
        return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
    }

    let emi_amount = calculate_emi(
        loan_data.principal_amount,
        loan_data.annual_interest_rate,
        loan_data.tenure_months,
    )?;

    let loan = sqlx::query_as::<_, VehicleLoan>(
        r#"
        INSERT INTO vehicle_loans (
            id, vehicle_id, lender_name, principal_amount, annual_interest_rate,
            tenure_months, emi_amount, start_date, loan_status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'active', NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(loan_data.vehicle_id)
    .bind(&loan_data.lender_name)
    .bind(loan_data.principal_amount)
    .bind(loan_data.annual_interest_rate)
    .bind(loan_data.tenure_months)
    .bind(emi_amount)
    .bind(loan_data.start_date)
    .fetch_one(&state.pool)
    .await?;

    log::info!(
        "🏦 Préstamo registrado: principal {} a {} meses, EMI {}",
        loan.principal_amount,
        loan.tenure_months,
        loan.emi_amount
    );

    Ok(Json(ApiResponse::success_with_message(
        VehicleLoanResponse::from(loan),
        "Préstamo registrado exitosamente".to_string(),
    )))
}

/// PUT /api/admin/vehicle-loans/:id - Actualizar un préstamo
///
/// Solo se pueden tocar el acreedor y el estado; los términos
/// financieros quedan inmutables después del alta.
pub async fn update_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(loan_data): Json<UpdateVehicleLoanRequest>,
) -> AppResult<Json<ApiResponse<VehicleLoanResponse>>> {
    loan_data.validate().map_err(AppError::Validation)?;

    let loan = sqlx::query_as::<_, VehicleLoan>(
        r#"
        UPDATE vehicle_loans SET
            lender_name = COALESCE($2, lender_name),
            loan_status = COALESCE($3, loan_status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(loan_data.lender_name)
    .bind(loan_data.loan_status)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Préstamo no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        VehicleLoanResponse::from(loan),
        "Préstamo actualizado exitosamente".to_string(),
    )))
}

/// GET /api/admin/vehicle-loans/:id/schedule - Tabla de amortización
pub async fn loan_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EmiSchedule>> {
    let loan = sqlx::query_as::<_, VehicleLoan>("SELECT * FROM vehicle_loans WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Préstamo no encontrado".to_string()))?;

    let schedule = build_schedule(
        loan.principal_amount,
        loan.annual_interest_rate,
        loan.tenure_months,
        loan.start_date,
    )?;

    Ok(Json(schedule))
}

/// DELETE /api/admin/vehicle-loans/:id - Eliminar un préstamo
pub async fn delete_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = sqlx::query("DELETE FROM vehicle_loans WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Préstamo no encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Crear el router de préstamos
pub fn create_vehicle_loans_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_loans))
        .route("/", post(create_loan))
        .route("/:id", get(get_loan))
        .route("/:id", put(update_loan))
        .route("/:id", delete(delete_loan))
        .route("/:id/schedule", get(loan_schedule))
}
