/**
 * Login Handler
 *
 * POST /api/auth/login (rate-limited, see `middleware::rate_limit`)
 *
 * 1. Look up the account by username, or by email when the value has an `@`
 * 2. Verify the password with bcrypt
 * 3. Record `last_login`
 * 4. Return a bearer token and the public account data
 *
 * Unknown account and wrong password answer the same 401 so the endpoint
 * does not reveal which accounts exist.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use bcrypt::verify;

use crate::backend::auth::handlers::parse_body;
use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::users::{get_user_by_login, touch_last_login, PublicUser};
use crate::backend::auth::AuthState;
use crate::backend::db::Database;
use crate::backend::error::{BackendError, BackendResult, Context};

const LOGIN_ERROR: &str = "Error al iniciar sesión";
pub const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

fn invalid_credentials() -> BackendError {
    BackendError::handler(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS)
}

pub async fn login(
    State(db): State<Database>,
    State(auth): State<AuthState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> BackendResult<Json<AuthResponse>> {
    let request = parse_body(body)?;
    let login = request.username.trim();
    tracing::info!("Login request for: {}", login);

    if login.is_empty() || request.password.is_empty() {
        return Err(invalid_credentials());
    }

    let pool = db.pool();
    let usuario = get_user_by_login(pool, login)
        .await
        .during(LOGIN_ERROR)?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", login);
            invalid_credentials()
        })?;

    if !verify(&request.password, &usuario.password_hash).during(LOGIN_ERROR)? {
        tracing::warn!("Invalid password for user: {}", login);
        return Err(invalid_credentials());
    }

    touch_last_login(pool, usuario.id).await.during(LOGIN_ERROR)?;
    let token = auth.tokens.issue(&usuario).during(LOGIN_ERROR)?;

    tracing::info!("User logged in successfully: {} ({})", usuario.username, usuario.email);

    Ok(Json(AuthResponse {
        success: true,
        message: "Inicio de sesión correcto".to_string(),
        token,
        user: PublicUser::from(&usuario),
    }))
}
