mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::Router;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚛 Fleet Backoffice - Gestión de flota y facturación");
    info!("====================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // CORS: permisivo en desarrollo, orígenes explícitos en producción
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    // Crear router de la API
    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .merge(api::create_api_router(app_state.clone()))
        .layer(cors)
        .with_state(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Auth:");
    info!("   POST /api/auth/login - Iniciar sesión");
    info!("   POST /api/auth/logout - Cerrar sesión");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("👷 Administración - Conductores:");
    info!("   CRUD /api/admin/drivers");
    info!("🚗 Administración - Vehículos:");
    info!("   CRUD /api/admin/vehicle-types");
    info!("   CRUD /api/admin/vehicles");
    info!("   CRUD /api/admin/vehicle-services");
    info!("   CRUD /api/admin/vehicle-loans (+ GET /:id/schedule)");
    info!("📝 Administración - Operación:");
    info!("   CRUD /api/admin/tripsheets (+ POST /:id/close)");
    info!("   GET  /api/admin/billings");
    info!("   POST /api/admin/billings/generate/:tripsheet_id");
    info!("   POST /api/admin/billings/:id/approve | /:id/pay");
    info!("💵 Administración - Nómina:");
    info!("   POST /api/admin/driver-salaries/generate");
    info!("   POST /api/admin/driver-salaries/:id/approve | /:id/pay");
    info!("   CRUD /api/admin/advance-salaries (+ approve/reject/pay)");
    info!("⚙️ Administración - Configuración:");
    info!("   GET/PUT /api/admin/settings");
    info!("   GET  /api/admin/fuel-price");
    info!("🧑‍✈️ Portal del conductor:");
    info!("   GET  /api/driver/tripsheets");
    info!("   GET  /api/driver/salaries");
    info!("   GET  /api/driver/advances");
    info!("   POST /api/driver/advances");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                anyhow::Error::from(e)
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
