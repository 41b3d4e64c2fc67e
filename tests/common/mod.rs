//! Common test utilities and helpers
//!
//! - Test server construction
//! - Database fixtures
//! - Authentication helpers

pub mod auth_helpers;
pub mod server;

// Re-export commonly used utilities
pub use auth_helpers::*;
pub use database::*;
pub use server::*;
