//! Middleware Module
//!
//! HTTP middleware applied in `routes`:
//!
//! - **`auth`** - Bearer-token authentication and the `AuthUser` extractor
//! - **`rate_limit`** - Per-client sliding-window limits on login and password reset

pub mod auth;

pub mod rate_limit;

pub use auth::{require_auth, AuthUser, AuthenticatedUser};
pub use rate_limit::{login_rate_limit, reset_rate_limit, RateLimiter};
