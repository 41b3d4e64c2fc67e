/**
 * Verify Token Handler
 *
 * GET /api/auth/verify-token (bearer)
 *
 * The bearer middleware has already checked the token and loaded the
 * account; this handler only echoes the account back.
 */

use axum::response::Json;

use crate::backend::auth::handlers::types::VerifyResponse;
use crate::backend::middleware::AuthUser;

pub async fn verify_token(AuthUser(user): AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        user: user.into(),
    })
}
