//! Handlers de autenticación
//!
//! Login por email/password con cookie de sesión HttpOnly respaldada
//! en la tabla sessions, logout con revocación y consulta del usuario
//! actual.

use axum::{
    extract::{Request, State},
    http::header,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Extension, Json, Router,
};
use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::auth::{
        auth_middleware, clear_session_cookie_header, extract_session_cookie,
        generate_session_token, session_cookie_header, AuthenticatedUser, Claims,
    },
    models::user::{LoginRequest, LoginResponse, User, UserResponse, UserStatus},
    models::ApiResponse,
    state::AppState,
    utils::errors::{AppError, AppResult},
};

/// POST /api/auth/login - Iniciar sesión
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    credentials.validate().map_err(AppError::Validation)?;

    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL",
    )
    .bind(&credentials.email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

    if user.user_status != UserStatus::Active {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    let password_ok = verify(&credentials.password, &user.password_hash)
        .map_err(|e| AppError::Hash(e.to_string()))?;
    if !password_ok {
        return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
    }

    // Crear la fila de sesión que respalda la cookie
    let session_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::seconds(state.config.session_expiration as i64);

    sqlx::query("INSERT INTO sessions (id, user_id, expires_at, created_at) VALUES ($1, $2, $3, NOW())")
        .bind(session_id)
        .bind(user.id)
        .bind(expires_at)
        .execute(&state.pool)
        .await?;

    let token = generate_session_token(user.id, session_id, &state.config)?;
    let cookie = session_cookie_header(&token, state.config.session_expiration);

    log::info!("🔓 Sesión iniciada para '{}' ({:?})", user.email, user.user_role);

    let response = LoginResponse {
        user: UserResponse::from(user),
        expires_at,
    };

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(ApiResponse::success_with_message(
            response,
            "Sesión iniciada exitosamente".to_string(),
        )),
    ))
}

/// POST /api/auth/logout - Cerrar sesión
///
/// Revoca la fila de sesión si la cookie es válida; en cualquier caso
/// responde borrando la cookie.
pub async fn logout(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = extract_session_cookie(&request) {
        if let Ok(token_data) = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(state.config.session_secret.as_ref()),
            &Validation::default(),
        ) {
            if let Ok(session_id) = Uuid::parse_str(&token_data.claims.sid) {
                sqlx::query(
                    "UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
                )
                .bind(session_id)
                .execute(&state.pool)
                .await?;
                log::info!("🔒 Sesión {} revocada", session_id);
            }
        }
    }

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie_header())]),
        Json(ApiResponse::success_with_message(
            (),
            "Sesión cerrada".to_string(),
        )),
    ))
}

/// GET /api/auth/me - Usuario autenticado actual
pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(user.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Crear el router de autenticación
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .layer(axum::middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected)
}
