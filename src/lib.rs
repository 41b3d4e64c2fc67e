//! Cabalgata - association administration backend
//!
//! Members, their relatives, processions, floats, seat assignments and
//! receipts, served through one generic table API with real-time updates.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared with browser clients
//!   - Real-time event envelope
//!   - REST response bodies and field errors
//!   - Seat identifier encoding
//!
//! - **`backend`** - The Axum server
//!   - Generic table CRUD with cascade deletes
//!   - WebSocket fan-out of every mutation
//!   - Operator authentication
//!
//! See `DESIGN.md` for the module map.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
