//! Generic Table API
//!
//! One set of CRUD handlers serves every table in the registry.
//!
//! # Module Structure
//!
//! ```text
//! tables/
//! ├── mod.rs       - Module exports and documentation
//! ├── queries.rs   - Fixed query templates
//! ├── cascade.rs   - Transactional cascade deletes and member renumbering
//! └── handlers.rs  - HTTP handlers
//! ```

/// Query templates
pub mod queries;

/// Cascade deletes
pub mod cascade;

/// HTTP handlers
pub mod handlers;

pub use cascade::{delete_with_cascade, CascadePolicy, DeleteOutcome};
pub use handlers::{
    create_record, delete_record, get_all, get_by_id, get_by_tipo, get_secondary, update_record,
};
