/**
 * Registration Handler
 *
 * POST /api/auth/register
 *
 * 1. Validate username, email and password (400 with field errors)
 * 2. Reject a taken username or email (409)
 * 3. Hash the password with bcrypt and create the account
 * 4. Return a bearer token with the public account data (201)
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, DEFAULT_COST};

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::handlers::{parse_body, validation};
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username, PublicUser};
use crate::backend::auth::AuthState;
use crate::backend::db::Database;
use crate::backend::error::{BackendError, BackendResult, Context};

const REGISTER_ERROR: &str = "Error al registrar el usuario";

pub async fn register(
    State(db): State<Database>,
    State(auth): State<AuthState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> BackendResult<(StatusCode, Json<AuthResponse>)> {
    let request = parse_body(body)?;
    let username = request.username.trim();
    let email = request.email.trim();
    tracing::info!("Register request for username: {}, email: {}", username, email);

    validation::registration(username, email, &request.password)?;

    let pool = db.pool();
    if get_user_by_username(pool, username).await.during(REGISTER_ERROR)?.is_some() {
        tracing::warn!("Username already exists: {}", username);
        return Err(BackendError::handler(
            StatusCode::CONFLICT,
            "El nombre de usuario ya está en uso",
        ));
    }
    if get_user_by_email(pool, email).await.during(REGISTER_ERROR)?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::handler(StatusCode::CONFLICT, "El email ya está registrado"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST).during(REGISTER_ERROR)?;

    let usuario = match create_user(pool, username, email, &password_hash).await {
        Ok(usuario) => usuario,
        // Lost a race with a concurrent registration
        Err(e) if e.is_unique_violation() => {
            return Err(BackendError::handler(
                StatusCode::CONFLICT,
                "El nombre de usuario o el email ya están registrados",
            ))
        }
        Err(e) => return Err(BackendError::from(e).during(REGISTER_ERROR)),
    };

    let token = auth.tokens.issue(&usuario).during(REGISTER_ERROR)?;
    tracing::info!("User created successfully: {} ({})", usuario.username, usuario.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Usuario registrado correctamente".to_string(),
            token,
            user: PublicUser::from(&usuario),
        }),
    ))
}
