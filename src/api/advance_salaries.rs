//! Handlers de AdvanceSalaries
//!
//! Anticipos de sueldo: alta por administración, aprobación, rechazo y
//! pago. Los anticipos pagados se descuentan luego en la nómina mensual.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::advance_salary::{
        AdvanceSalary, AdvanceSalaryFilters, AdvanceSalaryResponse, AdvanceSalaryWithRefs,
        CreateAdvanceRequest,
    },
    models::{ApiResponse, PaymentStatus},
    state::AppState,
    utils::errors::{AppError, AppResult},
};

const ADVANCE_WITH_REFS_SELECT: &str = r#"
    SELECT
        a.id, a.driver_id, u.full_name AS driver_name, a.amount, a.reason,
        a.payment_status, a.approved_at, a.paid_at, a.amount_deducted,
        a.deducted_in, a.created_at
    FROM advance_salaries a
    JOIN users u ON u.id = a.driver_id
"#;

/// GET /api/admin/advance-salaries - Listar anticipos con filtros
pub async fn list_advances(
    State(state): State<AppState>,
    Query(filters): Query<AdvanceSalaryFilters>,
) -> AppResult<Json<Vec<AdvanceSalaryResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let sql = format!(
        r#"{}
        WHERE ($1::uuid IS NULL OR a.driver_id = $1)
        AND ($2::payment_status IS NULL OR a.payment_status = $2)
        ORDER BY a.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
        ADVANCE_WITH_REFS_SELECT
    );

    let advances = sqlx::query_as::<_, AdvanceSalaryWithRefs>(&sql)
        .bind(filters.driver_id)
        .bind(filters.payment_status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(advances.into_iter().map(AdvanceSalaryResponse::from).collect()))
}

/// GET /api/admin/advance-salaries/:id - Obtener un anticipo
pub async fn get_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AdvanceSalaryResponse>> {
    let sql = format!("{} WHERE a.id = $1", ADVANCE_WITH_REFS_SELECT);

    let advance = sqlx::query_as::<_, AdvanceSalaryWithRefs>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Anticipo no encontrado".to_string()))?;

    Ok(Json(AdvanceSalaryResponse::from(advance)))
}

/// POST /api/admin/advance-salaries - Registrar un anticipo
pub async fn create_advance(
    State(state): State<AppState>,
    Json(advance_data): Json<CreateAdvanceRequest>,
) -> AppResult<Json<ApiResponse<AdvanceSalaryResponse>>> {
    advance_data.validate().map_err(AppError::Validation)?;

    let driver_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE id = $1 AND user_role = 'driver' AND deleted_at IS NULL",
    )
    .bind(advance_data.driver_id)
    .fetch_one(&state.pool)
    .await?;

    if driver_exists == 0 {
        return Err(AppError::NotFound("Conductor no encontrado".to_string()));
    }

    let advance = sqlx::query_as::<_, AdvanceSalary>(
        r#"
        INSERT INTO advance_salaries (
            id, driver_id, amount, reason, payment_status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, 'pending', NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(advance_data.driver_id)
    .bind(advance_data.amount)
    .bind(&advance_data.reason)
    .fetch_one(&state.pool)
    .await?;

    log::info!(
        "💸 Anticipo de {} registrado para conductor {}",
        advance.amount,
        advance.driver_id
    );

    Ok(Json(ApiResponse::success_with_message(
        AdvanceSalaryResponse::from(advance),
        "Anticipo registrado exitosamente".to_string(),
    )))
}

/// Cargar un anticipo y verificar que la transición de estado sea válida
async fn fetch_for_transition(
    state: &AppState,
    id: Uuid,
    target: PaymentStatus,
    conflict_message: &str,
) -> AppResult<AdvanceSalary> {
    let advance = sqlx::query_as::<_, AdvanceSalary>("SELECT * FROM advance_salaries WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Anticipo no encontrado".to_string()))?;

    if !advance.payment_status.can_transition_to(target) {
        return Err(AppError::Conflict(conflict_message.to_string()));
    }

    Ok(advance)
}

/// POST /api/admin/advance-salaries/:id/approve - Aprobar un anticipo
pub async fn approve_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AdvanceSalaryResponse>>> {
    fetch_for_transition(
        &state,
        id,
        PaymentStatus::Approved,
        "Solo se pueden aprobar anticipos pendientes",
    )
    .await?;

    let advance = sqlx::query_as::<_, AdvanceSalary>(
        r#"
        UPDATE advance_salaries
        SET payment_status = 'approved', approved_at = NOW(), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        AdvanceSalaryResponse::from(advance),
        "Anticipo aprobado".to_string(),
    )))
}

/// POST /api/admin/advance-salaries/:id/reject - Rechazar un anticipo
pub async fn reject_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AdvanceSalaryResponse>>> {
    fetch_for_transition(
        &state,
        id,
        PaymentStatus::Rejected,
        "Solo se pueden rechazar anticipos pendientes",
    )
    .await?;

    let advance = sqlx::query_as::<_, AdvanceSalary>(
        r#"
        UPDATE advance_salaries
        SET payment_status = 'rejected', updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        AdvanceSalaryResponse::from(advance),
        "Anticipo rechazado".to_string(),
    )))
}

/// POST /api/admin/advance-salaries/:id/pay - Pagar un anticipo aprobado
pub async fn pay_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AdvanceSalaryResponse>>> {
    fetch_for_transition(
        &state,
        id,
        PaymentStatus::Paid,
        "Solo se pueden pagar anticipos aprobados",
    )
    .await?;

    let advance = sqlx::query_as::<_, AdvanceSalary>(
        r#"
        UPDATE advance_salaries
        SET payment_status = 'paid', paid_at = NOW(), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    log::info!("💸 Anticipo {} pagado", advance.id);

    Ok(Json(ApiResponse::success_with_message(
        AdvanceSalaryResponse::from(advance),
        "Anticipo pagado".to_string(),
    )))
}

/// Crear el router de anticipos
pub fn create_advance_salaries_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_advances))
        .route("/", post(create_advance))
        .route("/:id", get(get_advance))
        .route("/:id/approve", post(approve_advance))
        .route("/:id/reject", post(reject_advance))
        .route("/:id/pay", post(pay_advance))
}
