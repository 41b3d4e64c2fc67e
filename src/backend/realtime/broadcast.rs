/**
 * Real-time Event Broadcasting
 *
 * A process-wide hub built on `tokio::sync::broadcast`. Handlers emit a
 * `<table>_<action>` event after every successful mutation; each connected
 * WebSocket session holds a receiver and forwards the events it accepts.
 *
 * Emission is synchronous and fire-and-forget: the event lands in the
 * channel buffer and the call returns the number of live receivers. There is
 * no replay, so a session subscribing after an emission never sees it.
 */

use crate::shared::{ChangeKind, RealtimeEvent};
use tokio::sync::broadcast;

/// Default buffer of the hub channel
pub const DEFAULT_CAPACITY: usize = 1000;

/// Publish hub shared by every handler and session
#[derive(Clone, Debug)]
pub struct RealtimeHub {
    tx: broadcast::Sender<RealtimeEvent>,
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a new receiver; it only sees events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.tx.subscribe()
    }

    /// Number of connected receivers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Emit an event; returns how many receivers it reached
    pub fn emit(&self, event: RealtimeEvent) -> usize {
        broadcast_event(&self.tx, event)
    }

    /// Emit `<table>_<action>` to every client
    pub fn table_change(&self, table: &str, kind: ChangeKind, data: serde_json::Value) -> usize {
        self.emit(RealtimeEvent::table_change(table, kind, data))
    }

    /// Emit `<table>_<action>` to the clients that joined `room`
    pub fn table_change_in_room(
        &self,
        room: &str,
        table: &str,
        kind: ChangeKind,
        data: serde_json::Value,
    ) -> usize {
        self.emit(RealtimeEvent::table_change(table, kind, data).in_room(room))
    }
}

/// Broadcast a real-time event to all subscribers
///
/// Returns the number of active subscribers (0 if none).
pub fn broadcast_event(broadcast_tx: &broadcast::Sender<RealtimeEvent>, event: RealtimeEvent) -> usize {
    let name = event.event.clone();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] {} broadcast to {} subscribers", name, subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers to receive {}", name);
            0
        }
    }
}
