/**
 * Real-time Event System
 *
 * This module defines the events mirrored to connected browser clients after
 * every successful table mutation. Events are named `<table>_<action>` and
 * carry the affected record (or `{id}` for deletes).
 */
use serde::{Deserialize, Serialize};

/// Kind of table mutation an event reports
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Row inserted
    Created,
    /// Row updated
    Updated,
    /// Row deleted (directly or by cascade)
    Deleted,
}

impl ChangeKind {
    /// Suffix used in the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// Real-time event that can be broadcast to all subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeEvent {
    /// Event name, e.g. `Socios_created`
    pub event: String,
    /// Event payload (JSON-serializable data)
    pub data: serde_json::Value,
    /// Room the event is scoped to; `None` reaches every client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Timestamp when event occurred
    pub timestamp: String,
}

impl RealtimeEvent {
    /// Create a new global event
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
            room: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a `<table>_<action>` event
    pub fn table_change(table: &str, kind: ChangeKind, data: serde_json::Value) -> Self {
        Self::new(format!("{}_{}", table, kind.as_str()), data)
    }

    /// Create a `<table>_deleted` event for a single id
    pub fn deleted(table: &str, id: serde_json::Value) -> Self {
        Self::table_change(table, ChangeKind::Deleted, serde_json::json!({ "id": id }))
    }

    /// Scope the event to a room
    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Frame sent to clients over the WebSocket: `{"event": ..., "data": ...}`
    pub fn to_frame(&self) -> serde_json::Value {
        serde_json::json!({
            "event": self.event,
            "data": self.data,
        })
    }
}

/// Frame sent by a client over the real-time channel
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}
