/**
 * Authentication Middleware
 *
 * Protects routes that need a logged-in operator. The middleware reads the
 * `Authorization: Bearer <token>` header, verifies the token, checks that
 * the account still exists and stores an `AuthenticatedUser` in the request
 * extensions for the `AuthUser` extractor.
 *
 * Failures answer 401 with `Token no proporcionado` (no usable header) or
 * `Token inválido` (bad signature, expired, unknown account).
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::users::{get_user_by_id, PublicUser};
use crate::backend::auth::AuthState;
use crate::backend::db::Database;
use crate::backend::error::{BackendError, BackendResult, Context};

pub const MISSING_TOKEN: &str = "Token no proporcionado";
pub const INVALID_TOKEN: &str = "Token inválido";

/// Account data attached to an authenticated request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<AuthenticatedUser> for PublicUser {
    fn from(user: AuthenticatedUser) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Token carried by `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Bearer-token middleware
pub async fn require_auth(
    State(auth): State<AuthState>,
    State(db): State<Database>,
    mut request: Request,
    next: Next,
) -> BackendResult<Response> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::warn!("Missing or malformed Authorization header");
        BackendError::handler(StatusCode::UNAUTHORIZED, MISSING_TOKEN)
    })?;

    let claims = auth.tokens.verify(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::handler(StatusCode::UNAUTHORIZED, INVALID_TOKEN)
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| BackendError::handler(StatusCode::UNAUTHORIZED, INVALID_TOKEN))?;

    // The account may have been removed after the token was issued.
    let usuario = get_user_by_id(db.pool(), user_id)
        .await
        .during("Error al verificar el token")?
        .ok_or_else(|| {
            tracing::warn!("Token for missing user {}", user_id);
            BackendError::handler(StatusCode::UNAUTHORIZED, INVALID_TOKEN)
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: usuario.id,
        username: usuario.username,
        email: usuario.email,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only usable behind `require_auth`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::handler(StatusCode::UNAUTHORIZED, MISSING_TOKEN)
            })
    }
}
