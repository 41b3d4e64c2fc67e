//! Route Configuration Module
//!
//! Routes are organized by functionality into focused submodules:
//!
//! - **`router`** - Router assembly, fallback and layers
//! - **`table_routes`** - Generic table API and seat routes
//! - **`auth_routes`** - `/api/auth/*` with rate limiting and bearer checks
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs           - Module exports and documentation
//! ├── router.rs        - Main router creation
//! ├── table_routes.rs  - Table and seat routes
//! └── auth_routes.rs   - Authentication routes
//! ```
//!
//! Every path lives under `/api` except the `/ws` alias of the real-time
//! socket. Anything unmatched answers `404 {"success": false, "message": "Ruta no encontrada"}`.

/// Main router creation
pub mod router;

/// Table and seat routes
pub mod table_routes;

/// Authentication routes
pub mod auth_routes;

pub use router::create_router;
