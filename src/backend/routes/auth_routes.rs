/**
 * Authentication Routes
 *
 * - `POST /api/auth/register` - Account registration
 * - `POST /api/auth/login` - Login (5 / 15 min per client)
 * - `POST /api/auth/forgot-password` - Request a reset link (3 / hour per client)
 * - `POST /api/auth/reset-password` - Set a new password from a reset token (same limiter)
 * - `POST /api/auth/change-password` - Change password (bearer)
 * - `GET  /api/auth/verify-token` - Current account (bearer)
 *
 * Limiters and the bearer check are attached per route with `route_layer`,
 * so an unknown path under `/api/auth` still reaches the 404 fallback.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{
    change_password, forgot_password, login, register, reset_password, verify_token,
};
use crate::backend::middleware::{login_rate_limit, require_auth, reset_rate_limit};
use crate::backend::server::state::AppState;

/// Configure the authentication routes
pub fn configure_auth_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route("/api/auth/register", post(register))
        .route(
            "/api/auth/login",
            post(login).route_layer(from_fn_with_state(state.clone(), login_rate_limit)),
        )
        .route(
            "/api/auth/forgot-password",
            post(forgot_password).route_layer(from_fn_with_state(state.clone(), reset_rate_limit)),
        )
        .route(
            "/api/auth/reset-password",
            post(reset_password).route_layer(from_fn_with_state(state.clone(), reset_rate_limit)),
        )
        .route(
            "/api/auth/change-password",
            post(change_password).route_layer(from_fn_with_state(state.clone(), require_auth)),
        )
        .route(
            "/api/auth/verify-token",
            get(verify_token).route_layer(from_fn_with_state(state.clone(), require_auth)),
        )
}
