//! Authentication Module
//!
//! Operator accounts, bearer tokens and password recovery for the
//! administration front end.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - AuthState and exports
//! ├── users.rs        - Account model and database operations
//! ├── sessions.rs     - JWT issuing and verification
//! ├── mailer.rs       - Password-reset mail delivery
//! └── handlers/       - HTTP handlers for /api/auth/*
//! ```
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Tokens are stateless HS256 JWTs; the account must still exist when one is presented
//! - Invalid credentials answer 401 without saying which part was wrong
//! - Login and password-reset requests are rate-limited per client address
//!
//! The generic table API does not depend on this module unless
//! `REQUIRE_AUTH_FOR_MUTATIONS` is set.

/// Account model and database operations
pub mod users;

/// JWT token management
pub mod sessions;

/// Password-reset mail
pub mod mailer;

/// HTTP handlers for authentication endpoints
pub mod handlers;

use crate::backend::error::BackendResult;
use crate::backend::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::backend::server::config::ServerConfig;
use std::sync::Arc;

pub use handlers::{change_password, forgot_password, login, register, reset_password, verify_token};
pub use mailer::Mailer;
pub use sessions::{Claims, TokenIssuer};
pub use users::{PublicUser, Usuario};

/// Everything the auth handlers and middleware share
#[derive(Clone, Debug)]
pub struct AuthState {
    pub tokens: TokenIssuer,
    pub mailer: Arc<Mailer>,
    /// 5 attempts / 15 min per client
    pub login_limiter: RateLimiter,
    /// 3 requests / hour per client, shared by forgot and reset
    pub reset_limiter: RateLimiter,
    /// Base of password-reset links
    pub client_origin: String,
}

impl AuthState {
    pub fn new(config: &ServerConfig) -> BackendResult<Self> {
        Ok(Self {
            tokens: TokenIssuer::new(&config.jwt_secret, config.jwt_expires_hours),
            mailer: Arc::new(Mailer::from_settings(&config.mail)?),
            login_limiter: RateLimiter::new(RateLimitConfig::login()),
            reset_limiter: RateLimiter::new(RateLimitConfig::password_reset()),
            client_origin: config.client_origin.clone(),
        })
    }
}
