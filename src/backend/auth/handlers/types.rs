/**
 * Authentication Handler Types
 *
 * Request and response bodies of the `/api/auth` endpoints. Request
 * fields default to empty so a missing field reaches validation (400 with a
 * field message) instead of failing deserialization.
 */

use crate::backend::auth::users::PublicUser;
use serde::{Deserialize, Serialize};

/// Registration request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct RegisterRequest {
    /// 3-30 chars, letter first, then letters, digits or underscores
    pub username: String,
    pub email: String,
    /// At least 8 characters
    pub password: String,
}

/// Login request
///
/// `username` may also be the account email.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct ResetPasswordRequest {
    /// Token from the reset link
    pub token: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Returned by register and login
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    /// Bearer token
    pub token: String,
    pub user: PublicUser,
}

/// Plain `{success, message}` acknowledgement
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Returned by verify-token
#[derive(Serialize, Debug)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: PublicUser,
}
