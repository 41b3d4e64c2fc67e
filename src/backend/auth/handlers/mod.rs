//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs        - Module exports and body parsing
//! ├── types.rs      - Request and response types
//! ├── validation.rs - Field validation rules
//! ├── register.rs   - Account registration
//! ├── login.rs      - Login
//! ├── password.rs   - Forgot / reset / change password
//! └── verify.rs     - Token verification
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`forgot_password`** - POST /api/auth/forgot-password
//! - **`reset_password`** - POST /api/auth/reset-password
//! - **`change_password`** - POST /api/auth/change-password (bearer)
//! - **`verify_token`** - GET /api/auth/verify-token (bearer)

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};

use crate::backend::error::{BackendError, BackendResult};

/// Request and response types
pub mod types;

/// Field validation
pub mod validation;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Password handlers
pub mod password;

/// Token verification handler
pub mod verify;

pub use login::login;
pub use password::{change_password, forgot_password, reset_password};
pub use register::register;
pub use verify::verify_token;

/// Unwrap a JSON body, answering 400 when it does not parse
pub(crate) fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> BackendResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::warn!("Rejected auth request body: {}", rejection.body_text());
            Err(BackendError::handler(
                StatusCode::BAD_REQUEST,
                "El cuerpo de la petición no es JSON válido",
            ))
        }
    }
}
