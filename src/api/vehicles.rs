//! Handlers de Vehicles
//!
//! Este módulo maneja las operaciones CRUD para vehículos.

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
    models::vehicle::{
        CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleFilters, VehicleResponse,
        VehicleWithType,
    },
    models::ApiResponse,
    state::AppState,
    utils::errors::{conflict_error, AppError, AppResult},
};

const VEHICLE_WITH_TYPE_SELECT: &str = r#"
    SELECT
        v.id, v.registration_number, v.vehicle_type_id, vt.name AS vehicle_type_name,
        v.model, v.manufacture_year, v.vehicle_status, v.fc_expiry, v.permit_expiry,
        v.insurance_expiry, v.current_odometer, v.created_at
    FROM vehicles v
    JOIN vehicle_types vt ON vt.id = v.vehicle_type_id
"#;

/// GET /api/admin/vehicles - Listar vehículos con filtros
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let sql = format!(
        r#"{}
        WHERE v.deleted_at IS NULL
        AND ($1::vehicle_status IS NULL OR v.vehicle_status = $1)
        AND ($2::uuid IS NULL OR v.vehicle_type_id = $2)
        AND ($3::text IS NULL OR v.registration_number ILIKE '%' || $3 || '%')
        ORDER BY v.created_at DESC
        LIMIT $4 OFFSET $5
        "#,
        VEHICLE_WITH_TYPE_SELECT
    );

    let vehicles = sqlx::query_as::<_, VehicleWithType>(&sql)
        .bind(filters.vehicle_status)
        .bind(filters.vehicle_type_id)
        .bind(filters.registration_number)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

/// GET /api/admin/vehicles/:id - Obtener un vehículo
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VehicleResponse>> {
    let sql = format!("{} WHERE v.id = $1 AND v.deleted_at IS NULL", VEHICLE_WITH_TYPE_SELECT);

    let vehicle = sqlx::query_as::<_, VehicleWithType>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

    Ok(Json(VehicleResponse::from(vehicle)))
}

/// POST /api/admin/vehicles - Crear un vehículo
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(vehicle_data): Json<CreateVehicleRequest>,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    vehicle_data.validate().map_err(AppError::Validation)?;

    // El tipo de vehículo debe existir
    let type_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM vehicle_types WHERE id = $1",
    )
    .bind(vehicle_data.vehicle_type_id)
    .fetch_one(&state.pool)
    .await?;

    if type_exists == 0 {
        return Err(AppError::BadRequest("El tipo de vehículo no existe".to_string()));
    }

    let registration = vehicle_data.registration_number.trim().to_uppercase();

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM vehicles WHERE registration_number = $1 AND deleted_at IS NULL",
    )
    .bind(&registration)
    .fetch_one(&state.pool)
    .await?;

    if existing > 0 {
        return Err(conflict_error("Vehicle", "registration_number", &registration));
    }

    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        INSERT INTO vehicles (
            id, registration_number, vehicle_type_id, model, manufacture_year,
            vehicle_status, fc_expiry, permit_expiry, insurance_expiry,
            current_odometer, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, 'active', $6, $7, $8, $9, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&registration)
    .bind(vehicle_data.vehicle_type_id)
    .bind(&vehicle_data.model)
    .bind(vehicle_data.manufacture_year)
    .bind(vehicle_data.fc_expiry)
    .bind(vehicle_data.permit_expiry)
    .bind(vehicle_data.insurance_expiry)
    .bind(vehicle_data.current_odometer.unwrap_or(Decimal::ZERO))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        VehicleResponse::from(vehicle),
        "Vehículo creado exitosamente".to_string(),
    )))
}

/// PUT /api/admin/vehicles/:id - Actualizar un vehículo
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(vehicle_data): Json<UpdateVehicleRequest>,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    vehicle_data.validate().map_err(AppError::Validation)?;

    let registration = vehicle_data
        .registration_number
        .as_ref()
        .map(|r| r.trim().to_uppercase());

    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        UPDATE vehicles SET
            registration_number = COALESCE($2, registration_number),
            vehicle_type_id = COALESCE($3, vehicle_type_id),
            model = COALESCE($4, model),
            manufacture_year = COALESCE($5, manufacture_year),
            vehicle_status = COALESCE($6, vehicle_status),
            fc_expiry = COALESCE($7, fc_expiry),
            permit_expiry = COALESCE($8, permit_expiry),
            insurance_expiry = COALESCE($9, insurance_expiry),
            current_odometer = COALESCE($10, current_odometer),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(registration)
    .bind(vehicle_data.vehicle_type_id)
    .bind(vehicle_data.model)
    .bind(vehicle_data.manufacture_year)
    .bind(vehicle_data.vehicle_status)
    .bind(vehicle_data.fc_expiry)
    .bind(vehicle_data.permit_expiry)
    .bind(vehicle_data.insurance_expiry)
    .bind(vehicle_data.current_odometer)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        VehicleResponse::from(vehicle),
        "Vehículo actualizado exitosamente".to_string(),
    )))
}

/// DELETE /api/admin/vehicles/:id - Eliminar un vehículo (soft delete)
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = sqlx::query(
        r#"
        UPDATE vehicles
        SET deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Crear el router de vehículos
pub fn create_vehicles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles))
        .route("/", post(create_vehicle))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
}
