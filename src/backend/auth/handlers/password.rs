/**
 * Password Handlers
 *
 * - POST /api/auth/forgot-password: store a one-hour reset token and mail
 *   the link. Always answers the same 200 so accounts cannot be enumerated,
 *   a malformed address included.
 * - POST /api/auth/reset-password: exchange a valid token for a new password.
 * - POST /api/auth/change-password (bearer): replace the password after
 *   checking the current one.
 *
 * The first two share the password-reset rate limiter.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::backend::auth::handlers::types::{
    ChangePasswordRequest, ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
};
use crate::backend::auth::handlers::{parse_body, validation};
use crate::backend::auth::users::{
    get_user_by_email, get_user_by_id, get_user_by_reset_token, set_reset_token, update_password,
};
use crate::backend::auth::AuthState;
use crate::backend::db::Database;
use crate::backend::error::{BackendError, BackendResult, Context};
use crate::backend::middleware::AuthUser;

pub const FORGOT_PASSWORD_MESSAGE: &str =
    "Si el email está registrado, recibirás un enlace para restablecer la contraseña";
pub const INVALID_RESET_TOKEN: &str = "Token inválido o expirado";
pub const WRONG_CURRENT_PASSWORD: &str = "La contraseña actual es incorrecta";

/// Lifetime of a reset token
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Build the link mailed to the account owner
pub fn reset_link(client_origin: &str, token: &str) -> String {
    format!("{}/reset-password?token={}", client_origin.trim_end_matches('/'), token)
}

pub async fn forgot_password(
    State(db): State<Database>,
    State(auth): State<AuthState>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> BackendResult<Json<MessageResponse>> {
    const ERROR: &str = "Error al solicitar el restablecimiento de contraseña";

    let request = parse_body(body)?;
    let email = request.email.trim();
    if validation::email(email).is_err() {
        tracing::info!("Password reset requested for malformed email {:?}", email);
        return Ok(Json(MessageResponse::ok(FORGOT_PASSWORD_MESSAGE)));
    }

    let pool = db.pool();
    match get_user_by_email(pool, email).await.during(ERROR)? {
        Some(usuario) => {
            let token = Uuid::new_v4().to_string();
            let expires = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
            set_reset_token(pool, usuario.id, &token, expires).await.during(ERROR)?;

            let link = reset_link(&auth.client_origin, &token);
            // A delivery failure must look like success to the caller.
            if let Err(e) = auth.mailer.send_password_reset(&usuario.email, &link).await {
                tracing::error!("Failed to send password reset mail to {}: {}", usuario.email, e);
            }
            tracing::info!("Password reset requested for user {}", usuario.username);
        }
        None => tracing::info!("Password reset requested for unknown email {}", email),
    }

    Ok(Json(MessageResponse::ok(FORGOT_PASSWORD_MESSAGE)))
}

pub async fn reset_password(
    State(db): State<Database>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> BackendResult<Json<MessageResponse>> {
    const ERROR: &str = "Error al restablecer la contraseña";

    let request = parse_body(body)?;
    validation::new_password("password", &request.password)?;

    let token = request.token.trim();
    if token.is_empty() {
        return Err(BackendError::handler(StatusCode::BAD_REQUEST, INVALID_RESET_TOKEN));
    }

    let pool = db.pool();
    let usuario = get_user_by_reset_token(pool, token)
        .await
        .during(ERROR)?
        .ok_or_else(|| {
            tracing::warn!("Invalid or expired reset token");
            BackendError::handler(StatusCode::BAD_REQUEST, INVALID_RESET_TOKEN)
        })?;

    let password_hash = hash(&request.password, DEFAULT_COST).during(ERROR)?;
    update_password(pool, usuario.id, &password_hash).await.during(ERROR)?;

    tracing::info!("Password reset for user {}", usuario.username);
    Ok(Json(MessageResponse::ok("Contraseña restablecida correctamente")))
}

pub async fn change_password(
    State(db): State<Database>,
    AuthUser(user): AuthUser,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> BackendResult<Json<MessageResponse>> {
    const ERROR: &str = "Error al cambiar la contraseña";

    let request = parse_body(body)?;
    validation::new_password("newPassword", &request.new_password)?;

    let pool = db.pool();
    let usuario = get_user_by_id(pool, user.id)
        .await
        .during(ERROR)?
        .ok_or_else(|| BackendError::handler(StatusCode::UNAUTHORIZED, "Token inválido"))?;

    if !verify(&request.current_password, &usuario.password_hash).during(ERROR)? {
        tracing::warn!("Wrong current password for user {}", usuario.username);
        return Err(BackendError::handler(StatusCode::BAD_REQUEST, WRONG_CURRENT_PASSWORD));
    }

    let password_hash = hash(&request.new_password, DEFAULT_COST).during(ERROR)?;
    update_password(pool, usuario.id, &password_hash).await.during(ERROR)?;

    tracing::info!("Password changed for user {}", usuario.username);
    Ok(Json(MessageResponse::ok("Contraseña actualizada correctamente")))
}
