//! Handlers de VehicleServices
//!
//! Historial de mantenimiento por vehículo.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::vehicle_service::{
        CreateVehicleServiceRequest, UpdateVehicleServiceRequest, VehicleService,
        VehicleServiceFilters, VehicleServiceResponse, VehicleServiceWithRefs,
    },
    models::ApiResponse,
    state::AppState,
    utils::errors::{AppError, AppResult},
};

const SERVICE_WITH_REFS_SELECT: &str = r#"
    SELECT
        s.id, s.vehicle_id, v.registration_number AS vehicle_registration,
        s.service_date, s.odometer_km, s.description, s.vendor_name, s.cost,
        s.next_service_km, s.next_service_date, s.created_at
    FROM vehicle_services s
    JOIN vehicles v ON v.id = s.vehicle_id
"#;

/// GET /api/admin/vehicle-services - Listar servicios con filtros
pub async fn list_services(
    State(state): State<AppState>,
    Query(filters): Query<VehicleServiceFilters>,
) -> AppResult<Json<Vec<VehicleServiceResponse>>> {
    let limit = filters.limit.unwrap_or(50).min(100);
    let offset = filters.offset.unwrap_or(0);

    let sql = format!(
        r#"{}
        WHERE ($1::uuid IS NULL OR s.vehicle_id = $1)
        AND ($2::date IS NULL OR s.service_date >= $2)
        AND ($3::date IS NULL OR s.service_date <= $3)
        ORDER BY s.service_date DESC
        LIMIT $4 OFFSET $5
        "#,
        SERVICE_WITH_REFS_SELECT
    );

    let services = sqlx::query_as::<_, VehicleServiceWithRefs>(&sql)
        .bind(filters.vehicle_id)
        .bind(filters.service_after)
        .bind(filters.service_before)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(services.into_iter().map(VehicleServiceResponse::from).collect()))
}

/// GET /api/admin/vehicle-services/:id - Obtener un servicio
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VehicleServiceResponse>> {
    let sql = format!("{} WHERE s.id = $1", SERVICE_WITH_REFS_SELECT);

    let service = sqlx::query_as::<_, VehicleServiceWithRefs>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Servicio no encontrado".to_string()))?;

    Ok(Json(VehicleServiceResponse::from(service)))
}

/// POST /api/admin/vehicle-services - Registrar un servicio
pub async fn create_service(
    State(state): State<AppState>,
    Json(service_data): Json<CreateVehicleServiceRequest>,
) -> AppResult<Json<ApiResponse<VehicleServiceResponse>>> {
    service_data.validate().map_err(AppError::Validation)?;

    let vehicle_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM vehicles WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(service_data.vehicle_id)
    .fetch_one(&state.pool)
    .await?;

    if vehicle_exists == 0 {
        return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
    }

    let service = sqlx::query_as::<_, VehicleService>(
        r#"
        INSERT INTO vehicle_services (
            id, vehicle_id, service_date, odometer_km, description, vendor_name,
            cost, next_service_km, next_service_date, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(service_data.vehicle_id)
    .bind(service_data.service_date)
    .bind(service_data.odometer_km)
    .bind(&service_data.description)
    .bind(&service_data.vendor_name)
    .bind(service_data.cost)
    .bind(service_data.next_service_km)
    .bind(service_data.next_service_date)
    .fetch_one(&state.pool)
    .await?;

    log::info!(
        "🔧 Servicio registrado para vehículo {} (costo {})",
        service.vehicle_id,
        service.cost
    );

    Ok(Json(ApiResponse::success_with_message(
        VehicleServiceResponse::from(service),
        "Servicio registrado exitosamente".to_string(),
    )))
}

/// PUT /api/admin/vehicle-services/:id - Actualizar un servicio
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(service_data): Json<UpdateVehicleServiceRequest>,
) -> AppResult<Json<ApiResponse<VehicleServiceResponse>>> {
    service_data.validate().map_err(AppError::Validation)?;

    let service = sqlx::query_as::<_, VehicleService>(
        r#"
        UPDATE vehicle_services SET
            service_date = COALESCE($2, service_date),
            odometer_km = COALESCE($3, odometer_km),
            description = COALESCE($4, description),
            vendor_name = COALESCE($5, vendor_name),
            cost = COALESCE($6, cost),
            next_service_km = COALESCE($7, next_service_km),
            next_service_date = COALESCE($8, next_service_date),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(service_data.service_date)
    .bind(service_data.odometer_km)
    .bind(service_data.description)
    .bind(service_data.vendor_name)
    .bind(service_data.cost)
    .bind(service_data.next_service_km)
    .bind(service_data.next_service_date)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Servicio no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        VehicleServiceResponse::from(service),
        "Servicio actualizado exitosamente".to_string(),
    )))
}

/// DELETE /api/admin/vehicle-services/:id - Eliminar un servicio
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = sqlx::query("DELETE FROM vehicle_services WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Servicio no encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Crear el router de servicios de vehículos
pub fn create_vehicle_services_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services))
        .route("/", post(create_service))
        .route("/:id", get(get_service))
        .route("/:id", put(update_service))
        .route("/:id", delete(delete_service))
}
