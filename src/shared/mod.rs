//! Shared Module
//!
//! Types shared between the server and its browser clients: the real-time
//! event envelope, REST response bodies, field-level validation errors and
//! the seat identifier encoding. Everything here is plain serializable data.

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// REST response envelopes
pub mod api;

/// Seat identifiers and occupants
pub mod seat;

/// Re-export commonly used types for convenience
pub use event::{ChangeKind, ClientFrame, RealtimeEvent};
pub use error::{FieldError, Validator};
pub use seat::{Occupant, SeatRef};
