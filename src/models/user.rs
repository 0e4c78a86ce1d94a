//! Modelo de User
//!
//! Este módulo contiene el struct User (admins y conductores) y sus
//! variantes para CRUD operations y autenticación.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Driver,
}

/// Estado del usuario - mapea al ENUM user_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub user_role: UserRole,
    pub user_status: UserStatus,
    pub licence_number: Option<String>,
    pub address: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub monthly_salary: Option<Decimal>,
    pub bata_per_day: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Request para crear un nuevo conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 10, max = 15))]
    pub phone: Option<String>,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 5, max = 30))]
    pub licence_number: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    pub joining_date: Option<NaiveDate>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub monthly_salary: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub bata_per_day: Option<Decimal>,
}

/// Request para actualizar un conductor existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 10, max = 15))]
    pub phone: Option<String>,

    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,

    pub user_status: Option<UserStatus>,

    #[validate(length(min = 5, max = 30))]
    pub licence_number: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    pub joining_date: Option<NaiveDate>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub monthly_salary: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub bata_per_day: Option<Decimal>,
}

/// Response de usuario para la API (sin password_hash)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_role: UserRole,
    pub user_status: UserStatus,
    pub licence_number: Option<String>,
    pub address: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub monthly_salary: Option<Decimal>,
    pub bata_per_day: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de conductores
#[derive(Debug, Deserialize)]
pub struct DriverFilters {
    pub full_name: Option<String>,
    pub user_status: Option<UserStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub expires_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            user_role: user.user_role,
            user_status: user.user_status,
            licence_number: user.licence_number,
            address: user.address,
            joining_date: user.joining_date,
            monthly_salary: user.monthly_salary,
            bata_per_day: user.bata_per_day,
            created_at: user.created_at,
        }
    }
}
