//! Handlers de Drivers
//!
//! CRUD de conductores (usuarios con rol driver) para el back office.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use bcrypt::{hash, DEFAULT_COST};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::user::{CreateDriverRequest, DriverFilters, UpdateDriverRequest, User, UserResponse},
    models::ApiResponse,
    state::AppState,
    utils::errors::{conflict_error, AppError, AppResult},
};

/// GET /api/admin/drivers - Listar conductores con filtros
pub async fn list_drivers(
    State(state): State<AppState>,
    Query(filters): Query<DriverFilters>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let drivers = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users
        WHERE user_role = 'driver'
        AND deleted_at IS NULL
        AND ($1::user_status IS NULL OR user_status = $1)
        AND ($2::text IS NULL OR full_name ILIKE '%' || $2 || '%')
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(filters.user_status)
    .bind(filters.full_name)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(drivers.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/admin/drivers/:id - Obtener un conductor
pub async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let driver = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id = $1 AND user_role = 'driver' AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

    Ok(Json(UserResponse::from(driver)))
}

/// POST /api/admin/drivers - Crear un conductor
pub async fn create_driver(
    State(state): State<AppState>,
    Json(driver_data): Json<CreateDriverRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    driver_data.validate().map_err(AppError::Validation)?;

    // Verificar que el email no esté registrado
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE email = $1 AND deleted_at IS NULL",
    )
    .bind(&driver_data.email)
    .fetch_one(&state.pool)
    .await?;

    if existing > 0 {
        return Err(conflict_error("Driver", "email", &driver_data.email));
    }

    let password_hash =
        hash(&driver_data.password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;

    let driver = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (
            id, full_name, email, phone, password_hash, user_role, user_status,
            licence_number, address, joining_date, monthly_salary, bata_per_day,
            created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, 'driver', 'active', $6, $7, $8, $9, $10, NOW(), NOW()
        )
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&driver_data.full_name)
    .bind(&driver_data.email)
    .bind(&driver_data.phone)
    .bind(&password_hash)
    .bind(&driver_data.licence_number)
    .bind(&driver_data.address)
    .bind(driver_data.joining_date)
    .bind(driver_data.monthly_salary)
    .bind(driver_data.bata_per_day)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        UserResponse::from(driver),
        "Conductor creado exitosamente".to_string(),
    )))
}

/// PUT /api/admin/drivers/:id - Actualizar un conductor
pub async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(driver_data): Json<UpdateDriverRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    driver_data.validate().map_err(AppError::Validation)?;

    let password_hash = match &driver_data.password {
        Some(password) => {
            Some(hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?)
        }
        None => None,
    };

    let driver = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            full_name = COALESCE($2, full_name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            password_hash = COALESCE($5, password_hash),
            user_status = COALESCE($6, user_status),
            licence_number = COALESCE($7, licence_number),
            address = COALESCE($8, address),
            joining_date = COALESCE($9, joining_date),
            monthly_salary = COALESCE($10, monthly_salary),
            bata_per_day = COALESCE($11, bata_per_day),
            updated_at = NOW()
        WHERE id = $1 AND user_role = 'driver' AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(driver_data.full_name)
    .bind(driver_data.email)
    .bind(driver_data.phone)
    .bind(password_hash)
    .bind(driver_data.user_status)
    .bind(driver_data.licence_number)
    .bind(driver_data.address)
    .bind(driver_data.joining_date)
    .bind(driver_data.monthly_salary)
    .bind(driver_data.bata_per_day)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        UserResponse::from(driver),
        "Conductor actualizado exitosamente".to_string(),
    )))
}

/// DELETE /api/admin/drivers/:id - Eliminar un conductor (soft delete)
pub async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND user_role = 'driver' AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Conductor no encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Crear el router de conductores
pub fn create_drivers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers))
        .route("/", post(create_driver))
        .route("/:id", get(get_driver))
        .route("/:id", put(update_driver))
        .route("/:id", delete(delete_driver))
}
