//! Backend Module
//!
//! The Axum server behind the association's administration front end.
//!
//! # Overview
//!
//! - One generic CRUD surface over the registered tables
//! - Transactional cascade deletes with member renumbering
//! - A WebSocket channel mirroring every mutation to connected clients
//! - Operator accounts with bearer tokens and password recovery
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Configuration, state and initialization
//! ├── routes/         - Route configuration
//! ├── db/             - Query gateway and table registry
//! ├── tables/         - Generic table handlers and cascade deletes
//! ├── seats/          - Seat availability and assignment listing
//! ├── realtime/       - Event broadcasting and WebSocket sessions
//! ├── auth/           - Accounts, tokens, password recovery
//! ├── middleware/     - Bearer auth and rate limiting
//! └── error/          - Error types and responses
//! ```
//!
//! # State Management
//!
//! Handlers share one `AppState`: the database gateway, the real-time hub,
//! the auth state and the loaded configuration. Every part is cheap to
//! clone; handlers extract only what they use through `FromRef`.
//!
//! # Example
//!
//! ```rust,no_run
//! use cabalgata::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Database gateway and table registry
pub mod db;

/// Generic table API
pub mod tables;

/// Seat assignments
pub mod seats;

/// Real-time update system
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use error::BackendError;
pub use realtime::RealtimeHub;
pub use server::create_app;
