//! Database Module
//!
//! - **`gateway`** - pooled query executor with `?`/`??` templates
//! - **`registry`** - tables and columns reachable through the generic API

pub mod gateway;

pub mod registry;

pub use gateway::{Database, DatabaseError, Param, Row, SqlType, SqlValue};
pub use registry::TableSchema;
