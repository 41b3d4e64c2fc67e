//! Seat Assignments
//!
//! Availability check used by the assignment form and a diagnostic listing
//! of every assignment with resolved names.
//!
//! - **`POST /api/socios-carrozas/verificar-sitio`** - `{carroza_id, sitio, tipo_usuario}` → `{disponible}`
//! - **`GET /api/debug/asignaciones`** - all assignments, ordered by float then seat
//!
//! The stored `sitio` is decoded with [`SeatRef`](crate::shared::SeatRef):
//! `"12"` is the assignment's member, `"12_p7"` is relative 7 of that member.

/// HTTP handlers
pub mod handlers;

pub use handlers::{check_seat, list_assignments, Assignment, AssignmentListing, OccupantView};
