/**
 * Real-time WebSocket Sessions
 *
 * Each browser session opens one WebSocket on `/api/ws`. The session
 * subscribes to the hub and forwards every event that is global or scoped to
 * a room the client joined. Clients send `join-room` / `leave-room` frames:
 *
 * ```json
 * {"event": "join-room", "data": "cortejo-2025"}
 * ```
 *
 * Server frames are `{"event": "<table>_<action>", "data": <payload>}`.
 *
 * # Connection Management
 *
 * - Lagged sessions skip the missed events and keep going (no replay)
 * - Malformed client frames are logged and ignored
 * - The session ends when the client closes or a send fails
 */

use crate::backend::realtime::broadcast::RealtimeHub;
use crate::shared::{ClientFrame, RealtimeEvent};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashSet;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// Outcome of a frame sent by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Joined(String),
    Left(String),
    Ignored(String),
}

/// Per-connection state
#[derive(Debug)]
pub struct ClientSession {
    pub id: Uuid,
    rooms: HashSet<String>,
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            rooms: HashSet::new(),
        }
    }

    pub fn rooms(&self) -> &HashSet<String> {
        &self.rooms
    }

    /// Whether this session should receive `event`
    pub fn accepts(&self, event: &RealtimeEvent) -> bool {
        match &event.room {
            None => true,
            Some(room) => self.rooms.contains(room),
        }
    }

    /// Apply a text frame sent by the client
    pub fn handle_frame(&mut self, text: &str) -> FrameOutcome {
        let frame: ClientFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => return FrameOutcome::Ignored(format!("frame inválido: {}", e)),
        };
        let room = match frame.data.as_str() {
            Some(room) if !room.trim().is_empty() => room.trim().to_string(),
            _ => return FrameOutcome::Ignored(format!("{} sin sala", frame.event)),
        };
        match frame.event.as_str() {
            "join-room" => {
                self.rooms.insert(room.clone());
                FrameOutcome::Joined(room)
            }
            "leave-room" => {
                self.rooms.remove(&room);
                FrameOutcome::Left(room)
            }
            other => FrameOutcome::Ignored(format!("evento desconocido: {}", other)),
        }
    }
}

/// Handle the WebSocket upgrade (GET /api/ws)
pub async fn handle_realtime_socket(
    ws: WebSocketUpgrade,
    State(hub): State<RealtimeHub>,
) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, hub))
}

async fn run_session(socket: WebSocket, hub: RealtimeHub) {
    let mut session = ClientSession::new();
    let mut events = hub.subscribe();
    let (mut sender, mut receiver) = socket.split();

    tracing::info!("[Realtime] Client {} connected ({} subscribers)", session.id, hub.subscriber_count());

    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => match session.handle_frame(text.as_str()) {
                    FrameOutcome::Joined(room) => {
                        tracing::info!("[Realtime] Client {} joined room {}", session.id, room)
                    }
                    FrameOutcome::Left(room) => {
                        tracing::info!("[Realtime] Client {} left room {}", session.id, room)
                    }
                    FrameOutcome::Ignored(reason) => {
                        tracing::warn!("[Realtime] Client {} frame ignored: {}", session.id, reason)
                    }
                },
                Some(Ok(Message::Ping(payload))) => {
                    if sender.send(Message::Pong(payload)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("[Realtime] Client {} socket error: {}", session.id, e);
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) => {
                    if !session.accepts(&event) {
                        continue;
                    }
                    let frame = match serde_json::to_string(&event.to_frame()) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Client {} lagged, skipped {} events", session.id, skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    tracing::info!("[Realtime] Client {} disconnected", session.id);
}
