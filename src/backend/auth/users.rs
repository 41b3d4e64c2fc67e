/**
 * Account Model and Database Operations
 *
 * Operator accounts live in `"Usuarios"`. The table is not part of the
 * generic table API; every read and write goes through this module.
 */

use crate::backend::db::DatabaseError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

const USUARIO_COLUMNS: &str = r#"id, username, email, password_hash, last_login, reset_token, reset_token_expires, created_at"#;

/// Account row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Usuario {
    pub id: i32,
    /// Unique, 3-30 chars, letter first
    pub username: String,
    /// Unique
    pub email: String,
    /// bcrypt hash
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
    /// Pending password-reset token (uuid v4)
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Account data that is safe to return to clients
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<&Usuario> for PublicUser {
    fn from(usuario: &Usuario) -> Self {
        Self {
            id: usuario.id,
            username: usuario.username.clone(),
            email: usuario.email.clone(),
        }
    }
}

/// Create a new account
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<Usuario, DatabaseError> {
    sqlx::query_as::<_, Usuario>(&format!(
        r#"INSERT INTO "Usuarios" (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}"#,
        USUARIO_COLUMNS
    ))
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::query("Error creando el usuario"))
}

/// Get account by username
pub async fn get_user_by_username(pool: &PgPool, username: &str) -> Result<Option<Usuario>, DatabaseError> {
    sqlx::query_as::<_, Usuario>(&format!(
        r#"SELECT {} FROM "Usuarios" WHERE username = $1"#,
        USUARIO_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::query("Error buscando el usuario por nombre"))
}

/// Get account by email (case-insensitive)
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<Usuario>, DatabaseError> {
    sqlx::query_as::<_, Usuario>(&format!(
        r#"SELECT {} FROM "Usuarios" WHERE lower(email) = lower($1)"#,
        USUARIO_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::query("Error buscando el usuario por email"))
}

/// Get account by username, or by email when `login` looks like one
pub async fn get_user_by_login(pool: &PgPool, login: &str) -> Result<Option<Usuario>, DatabaseError> {
    if login.contains('@') {
        get_user_by_email(pool, login).await
    } else {
        get_user_by_username(pool, login).await
    }
}

/// Get account by id
pub async fn get_user_by_id(pool: &PgPool, id: i32) -> Result<Option<Usuario>, DatabaseError> {
    sqlx::query_as::<_, Usuario>(&format!(
        r#"SELECT {} FROM "Usuarios" WHERE id = $1"#,
        USUARIO_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::query("Error buscando el usuario"))
}

/// Record a successful login
pub async fn touch_last_login(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
    sqlx::query(r#"UPDATE "Usuarios" SET last_login = now() WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await
        .map_err(DatabaseError::query("Error actualizando el último acceso"))?;
    Ok(())
}

/// Store a password-reset token
pub async fn set_reset_token(
    pool: &PgPool,
    id: i32,
    token: &str,
    expires: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    sqlx::query(r#"UPDATE "Usuarios" SET reset_token = $1, reset_token_expires = $2 WHERE id = $3"#)
        .bind(token)
        .bind(expires)
        .bind(id)
        .execute(pool)
        .await
        .map_err(DatabaseError::query("Error guardando el token de restablecimiento"))?;
    Ok(())
}

/// Get the account owning an unexpired reset token
pub async fn get_user_by_reset_token(pool: &PgPool, token: &str) -> Result<Option<Usuario>, DatabaseError> {
    sqlx::query_as::<_, Usuario>(&format!(
        r#"SELECT {} FROM "Usuarios" WHERE reset_token = $1 AND reset_token_expires > now()"#,
        USUARIO_COLUMNS
    ))
    .bind(token)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::query("Error buscando el token de restablecimiento"))
}

/// Replace the password hash and clear any pending reset token
pub async fn update_password(pool: &PgPool, id: i32, password_hash: &str) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"UPDATE "Usuarios" SET password_hash = $1, reset_token = NULL, reset_token_expires = NULL WHERE id = $2"#,
    )
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await
    .map_err(DatabaseError::query("Error actualizando la contraseña"))?;
    Ok(())
}
