//! Handlers de DriverSalaries
//!
//! Generación mensual de nómina de conductores: sueldo base, bata por
//! días de viaje y descuento de anticipos pendientes.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::driver_salary::{
        DriverSalary, DriverSalaryFilters, DriverSalaryResponse, DriverSalaryWithRefs,
        GenerateSalaryRequest,
    },
    models::user::User,
    models::{ApiResponse, PaymentStatus},
    services::salary::{calculate_salary, OutstandingAdvance, SalaryInput},
    state::AppState,
    utils::errors::{AppError, AppResult},
};

const SALARY_WITH_REFS_SELECT: &str = r#"
    SELECT
        s.id, s.driver_id, u.full_name AS driver_name, s.year, s.month,
        s.base_salary, s.bata_amount, s.deductions, s.advance_deducted,
        s.net_salary, s.payment_status, s.approved_at, s.paid_at, s.created_at
    FROM driver_salaries s
    JOIN users u ON u.id = s.driver_id
"#;

/// Rango de fechas [inicio, fin) del mes de nómina
fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::BadRequest("Mes de nómina inválido".to_string()))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::BadRequest("Mes de nómina inválido".to_string()))?;
    Ok((start, end))
}

/// GET /api/admin/driver-salaries - Listar nóminas con filtros
pub async fn list_salaries(
    State(state): State<AppState>,
    Query(filters): Query<DriverSalaryFilters>,
) -> AppResult<Json<Vec<DriverSalaryResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let sql = format!(
        r#"{}
        WHERE ($1::uuid IS NULL OR s.driver_id = $1)
        AND ($2::int IS NULL OR s.year = $2)
        AND ($3::int IS NULL OR s.month = $3)
        AND ($4::payment_status IS NULL OR s.payment_status = $4)
        ORDER BY s.year DESC, s.month DESC, u.full_name ASC
        LIMIT $5 OFFSET $6
        "#,
        SALARY_WITH_REFS_SELECT
    );

    let salaries = sqlx::query_as::<_, DriverSalaryWithRefs>(&sql)
        .bind(filters.driver_id)
        .bind(filters.year)
        .bind(filters.month)
        .bind(filters.payment_status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(salaries.into_iter().map(DriverSalaryResponse::from).collect()))
}

/// GET /api/admin/driver-salaries/:id - Obtener una nómina
pub async fn get_salary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DriverSalaryResponse>> {
    let sql = format!("{} WHERE s.id = $1", SALARY_WITH_REFS_SELECT);

    let salary = sqlx::query_as::<_, DriverSalaryWithRefs>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Nómina no encontrada".to_string()))?;

    Ok(Json(DriverSalaryResponse::from(salary)))
}

/// POST /api/admin/driver-salaries/generate - Generar nómina mensual
///
/// Días de viaje contados sobre hojas cerradas o facturadas del mes.
/// Los anticipos pagados con saldo se consumen en orden de antigüedad
/// hasta cubrir lo pagable; el último puede quedar descontado a medias
/// y el anticipo saldado se marca con deducted_in.
pub async fn generate_salary(
    State(state): State<AppState>,
    Json(request): Json<GenerateSalaryRequest>,
) -> AppResult<Json<ApiResponse<DriverSalaryResponse>>> {
    request.validate().map_err(AppError::Validation)?;

    let driver = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id = $1 AND user_role = 'driver' AND deleted_at IS NULL",
    )
    .bind(request.driver_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM driver_salaries WHERE driver_id = $1 AND year = $2 AND month = $3",
    )
    .bind(request.driver_id)
    .bind(request.year)
    .bind(request.month)
    .fetch_one(&state.pool)
    .await?;

    if existing > 0 {
        return Err(AppError::Conflict(
            "La nómina de ese mes ya fue generada para este conductor".to_string(),
        ));
    }

    let (month_start, month_end) = month_bounds(request.year, request.month as u32)?;

    let trip_days = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        SELECT SUM(COALESCE(end_date, start_date) - start_date + 1)
        FROM tripsheets
        WHERE driver_id = $1
        AND tripsheet_status IN ('closed', 'billed')
        AND start_date >= $2 AND start_date < $3
        "#,
    )
    .bind(request.driver_id)
    .bind(month_start)
    .bind(month_end)
    .fetch_one(&state.pool)
    .await?
    .unwrap_or(0);

    let advances = sqlx::query_as::<_, OutstandingAdvance>(
        r#"
        SELECT id, amount - amount_deducted AS amount
        FROM advance_salaries
        WHERE driver_id = $1 AND payment_status = 'paid' AND amount_deducted < amount
        ORDER BY created_at ASC
        "#,
    )
    .bind(request.driver_id)
    .fetch_all(&state.pool)
    .await?;

    let input = SalaryInput {
        base_salary: driver.monthly_salary.unwrap_or(Decimal::ZERO),
        bata_per_day: driver.bata_per_day.unwrap_or(Decimal::ZERO),
        trip_days,
        deductions: request.deductions.unwrap_or(Decimal::ZERO),
        outstanding_advances: advances,
    };

    let breakdown = calculate_salary(&input)?;

    let mut tx = state.pool.begin().await?;

    let salary = sqlx::query_as::<_, DriverSalary>(
        r#"
        INSERT INTO driver_salaries (
            id, driver_id, year, month, base_salary, bata_amount, deductions,
            advance_deducted, net_salary, payment_status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.driver_id)
    .bind(request.year)
    .bind(request.month)
    .bind(breakdown.base_salary)
    .bind(breakdown.bata_amount)
    .bind(breakdown.deductions)
    .bind(breakdown.advance_deducted)
    .bind(breakdown.net_salary)
    .fetch_one(&mut *tx)
    .await?;

    for consumed in &breakdown.consumed_advances {
        sqlx::query(
            r#"
            UPDATE advance_salaries
            SET amount_deducted = amount_deducted + $1,
                deducted_in = CASE WHEN $2::bool THEN $3::uuid ELSE deducted_in END,
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(consumed.amount)
        .bind(consumed.exhausted)
        .bind(salary.id)
        .bind(consumed.advance_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    log::info!(
        "📋 Nómina {}/{} generada para conductor {} (neto {})",
        salary.month,
        salary.year,
        driver.full_name,
        salary.net_salary
    );

    Ok(Json(ApiResponse::success_with_message(
        DriverSalaryResponse::from(salary),
        "Nómina generada exitosamente".to_string(),
    )))
}

/// POST /api/admin/driver-salaries/:id/approve - Aprobar una nómina
pub async fn approve_salary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DriverSalaryResponse>>> {
    let salary = sqlx::query_as::<_, DriverSalary>("SELECT * FROM driver_salaries WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Nómina no encontrada".to_string()))?;

    if !salary.payment_status.can_transition_to(PaymentStatus::Approved) {
        return Err(AppError::Conflict(
            "Solo se pueden aprobar nóminas pendientes".to_string(),
        ));
    }

    let salary = sqlx::query_as::<_, DriverSalary>(
        r#"
        UPDATE driver_salaries
        SET payment_status = 'approved', approved_at = NOW(), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        DriverSalaryResponse::from(salary),
        "Nómina aprobada".to_string(),
    )))
}

/// POST /api/admin/driver-salaries/:id/pay - Registrar el pago de una nómina
pub async fn pay_salary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DriverSalaryResponse>>> {
    let salary = sqlx::query_as::<_, DriverSalary>("SELECT * FROM driver_salaries WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Nómina no encontrada".to_string()))?;

    if !salary.payment_status.can_transition_to(PaymentStatus::Paid) {
        return Err(AppError::Conflict(
            "Solo se pueden pagar nóminas aprobadas".to_string(),
        ));
    }

    let salary = sqlx::query_as::<_, DriverSalary>(
        r#"
        UPDATE driver_salaries
        SET payment_status = 'paid', paid_at = NOW(), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    log::info!("💰 Nómina {}/{} pagada", salary.month, salary.year);

    Ok(Json(ApiResponse::success_with_message(
        DriverSalaryResponse::from(salary),
        "Pago de nómina registrado".to_string(),
    )))
}

/// Crear el router de nóminas
pub fn create_driver_salaries_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_salaries))
        .route("/generate", post(generate_salary))
        .route("/:id", get(get_salary))
        .route("/:id/approve", post(approve_salary))
        .route("/:id/pay", post(pay_salary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_regular_month() {
        let (start, end) = month_bounds(2024, 3).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn month_bounds_december_rolls_year() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn month_bounds_rejects_invalid_month() {
        assert!(month_bounds(2024, 13).is_err());
        assert!(month_bounds(2024, 0).is_err());
    }
}
