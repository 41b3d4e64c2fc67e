//! Server Module
//!
//! Startup of the Axum HTTP server.
//!
//! - **`config`** - Environment configuration, pool creation, migrations
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`init`** - State assembly and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - ServerConfig, lazy pool, migrations
//! └── init.rs         - build_state / create_app
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::{build_state, create_app};
pub use state::AppState;
