//! Real-time Update Module
//!
//! Mirrors every table mutation to connected browser clients so their
//! already-loaded views stay fresh without polling.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── broadcast.rs  - Process-wide publish hub
//! └── socket.rs     - WebSocket sessions with room membership
//! ```
//!
//! Initial state is always loaded through the REST endpoints; the channel
//! carries no history and gives no delivery guarantee.

/// Event broadcasting hub
pub mod broadcast;

/// WebSocket session handler
pub mod socket;

// Re-export commonly used types and functions
pub use broadcast::{broadcast_event, RealtimeHub};
pub use socket::handle_realtime_socket;
