//! Modelo de Session
//!
//! Sesiones respaldadas en base de datos: el cierre de sesión revoca
//! la fila y el middleware rechaza cookies de sesiones revocadas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Session - mapea exactamente a la tabla sessions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Una sesión es válida si no está revocada ni expirada
    pub fn is_live(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            expires_at: Utc::now() + expires_in,
            revoked_at: revoked.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_liveness() {
        assert!(session(Duration::hours(1), false).is_live());
        assert!(!session(Duration::hours(-1), false).is_live());
        assert!(!session(Duration::hours(1), true).is_live());
    }
}
