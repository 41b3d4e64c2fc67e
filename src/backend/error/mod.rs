//! Backend Error Module
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! Every handler failure is caught at the handler boundary and rendered as
//! `{"success": false, "message": ...}`. Nothing is retried; clients treat a
//! 500 as terminal for that action and re-fetch full state.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, BackendResult, Context, INTERNAL_ERROR_MESSAGE};
