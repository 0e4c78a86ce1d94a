//! Handlers de VehicleTypes
//!
//! CRUD de tipos de vehículo con sus tarifas de facturación.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::vehicle_type::{
        CreateVehicleTypeRequest, UpdateVehicleTypeRequest, VehicleType, VehicleTypeFilters,
        VehicleTypeResponse,
    },
    models::ApiResponse,
    state::AppState,
    utils::errors::{conflict_error, AppError, AppResult},
};

/// GET /api/admin/vehicle-types - Listar tipos de vehículo
pub async fn list_vehicle_types(
    State(state): State<AppState>,
    Query(filters): Query<VehicleTypeFilters>,
) -> AppResult<Json<Vec<VehicleTypeResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let types = sqlx::query_as::<_, VehicleType>(
        r#"
        SELECT * FROM vehicle_types
        WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
        ORDER BY name ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(filters.name)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(types.into_iter().map(VehicleTypeResponse::from).collect()))
}

/// GET /api/admin/vehicle-types/:id - Obtener un tipo de vehículo
pub async fn get_vehicle_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VehicleTypeResponse>> {
    let vehicle_type = sqlx::query_as::<_, VehicleType>("SELECT * FROM vehicle_types WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Tipo de vehículo no encontrado".to_string()))?;

    Ok(Json(VehicleTypeResponse::from(vehicle_type)))
}

/// POST /api/admin/vehicle-types - Crear un tipo de vehículo
pub async fn create_vehicle_type(
    State(state): State<AppState>,
    Json(type_data): Json<CreateVehicleTypeRequest>,
) -> AppResult<Json<ApiResponse<VehicleTypeResponse>>> {
    type_data.validate().map_err(AppError::Validation)?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM vehicle_types WHERE LOWER(name) = LOWER($1)",
    )
    .bind(&type_data.name)
    .fetch_one(&state.pool)
    .await?;

    if existing > 0 {
        return Err(conflict_error("VehicleType", "name", &type_data.name));
    }

    let vehicle_type = sqlx::query_as::<_, VehicleType>(
        r#"
        INSERT INTO vehicle_types (
            id, name, description, rate_per_km, minimum_km_per_day,
            driver_bata_per_day, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&type_data.name)
    .bind(&type_data.description)
    .bind(type_data.rate_per_km)
    .bind(type_data.minimum_km_per_day)
    .bind(type_data.driver_bata_per_day)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        VehicleTypeResponse::from(vehicle_type),
        "Tipo de vehículo creado exitosamente".to_string(),
    )))
}

/// PUT /api/admin/vehicle-types/:id - Actualizar un tipo de vehículo
pub async fn update_vehicle_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(type_data): Json<UpdateVehicleTypeRequest>,
) -> AppResult<Json<ApiResponse<VehicleTypeResponse>>> {
    type_data.validate().map_err(AppError::Validation)?;

    let vehicle_type = sqlx::query_as::<_, VehicleType>(
        r#"
        UPDATE vehicle_types SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            rate_per_km = COALESCE($4, rate_per_km),
            minimum_km_per_day = COALESCE($5, minimum_km_per_day),
            driver_bata_per_day = COALESCE($6, driver_bata_per_day),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(type_data.name)
    .bind(type_data.description)
    .bind(type_data.rate_per_km)
    .bind(type_data.minimum_km_per_day)
    .bind(type_data.driver_bata_per_day)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Tipo de vehículo no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        VehicleTypeResponse::from(vehicle_type),
        "Tipo de vehículo actualizado exitosamente".to_string(),
    )))
}

/// DELETE /api/admin/vehicle-types/:id - Eliminar un tipo de vehículo
pub async fn delete_vehicle_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    // Un tipo referenciado por vehículos no se puede eliminar
    let in_use = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM vehicles WHERE vehicle_type_id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    if in_use > 0 {
        return Err(AppError::Conflict(
            "El tipo de vehículo tiene vehículos asociados".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM vehicle_types WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Tipo de vehículo no encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Crear el router de tipos de vehículo
pub fn create_vehicle_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicle_types))
        .route("/", post(create_vehicle_type))
        .route("/:id", get(get_vehicle_type))
        .route("/:id", put(update_vehicle_type))
        .route("/:id", delete(delete_vehicle_type))
}
