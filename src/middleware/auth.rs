//! Middleware de autenticación por cookie de sesión
//!
//! La cookie `session` lleva un JWT firmado; cada request decodifica el
//! token, verifica que la fila de sesión siga viva (no revocada, no
//! expirada) y carga el usuario antes de inyectarlo en las extensions.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::EnvironmentConfig,
    models::session::Session,
    models::user::{User, UserRole, UserStatus},
    state::AppState,
    utils::errors::AppError,
};

/// Nombre de la cookie de sesión
pub const SESSION_COOKIE: &str = "session";

/// Claims del JWT de sesión
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub sid: String, // session_id
    pub exp: usize,
    pub iat: usize,
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

/// Extraer el valor de la cookie de sesión del header Cookie
pub fn extract_session_cookie(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                cookie
                    .trim()
                    .strip_prefix(SESSION_COOKIE)
                    .and_then(|rest| rest.strip_prefix('='))
                    .map(|token| token.to_string())
            })
        })
}

/// Middleware de autenticación por sesión
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_session_cookie(&request)
        .ok_or_else(|| AppError::Unauthorized("Cookie de sesión requerida".to_string()))?;

    // Decodificar y validar el JWT de la cookie
    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.config.session_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Token de sesión inválido".to_string()))?;

    let claims = token_data.claims;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;
    let session_id = Uuid::parse_str(&claims.sid)
        .map_err(|_| AppError::Unauthorized("ID de sesión inválido".to_string()))?;

    // Verificar que la sesión sigue viva en la base de datos
    let session = sqlx::query_as::<_, Session>(
        "SELECT * FROM sessions WHERE id = $1 AND user_id = $2",
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Sesión no encontrada".to_string()))?;

    if !session.is_live() {
        return Err(AppError::Unauthorized("Sesión revocada o expirada".to_string()));
    }

    // Cargar el usuario y verificar que esté activo
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if user.user_status != UserStatus::Active {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        user_role: user.user_role,
    };

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if user.user_role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Middleware para verificar que el usuario es conductor
pub async fn driver_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if user.user_role != UserRole::Driver {
        return Err(AppError::Forbidden(
            "Endpoint exclusivo para conductores".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Generar el JWT de sesión
pub fn generate_session_token(
    user_id: Uuid,
    session_id: Uuid,
    config: &EnvironmentConfig,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.session_expiration as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        sid: session_id.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.session_secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando token de sesión: {}", e)))
}

/// Construir el header Set-Cookie de la sesión
pub fn session_cookie_header(token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// Construir el header Set-Cookie que borra la sesión
pub fn clear_session_cookie_header() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_cookie(value: &str) -> Request {
        Request::builder()
            .header(header::COOKIE, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_session_cookie() {
        let req = request_with_cookie("session=abc123");
        assert_eq!(extract_session_cookie(&req), Some("abc123".to_string()));

        let req = request_with_cookie("theme=dark; session=tok; lang=es");
        assert_eq!(extract_session_cookie(&req), Some("tok".to_string()));

        // Prefijos parecidos no cuentan
        let req = request_with_cookie("session_old=zzz");
        assert_eq!(extract_session_cookie(&req), None);

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_session_cookie(&req), None);
    }

    #[test]
    fn test_session_cookie_headers() {
        let header = session_cookie_header("tok", 3600);
        assert!(header.starts_with("session=tok;"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Max-Age=3600"));

        assert!(clear_session_cookie_header().contains("Max-Age=0"));
    }
}
