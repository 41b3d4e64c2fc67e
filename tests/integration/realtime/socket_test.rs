//! WebSocket endpoint tests over a real connection

use axum::http::StatusCode;
use axum_test::{TestWebSocket, WsMessage};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;

use cabalgata::shared::ChangeKind;

use crate::common::{create_ws_test_server, TestDatabase};

/// Next text frame as JSON, skipping control frames
async fn next_frame(socket: &mut TestWebSocket) -> Value {
    loop {
        match socket.receive_message().await {
            WsMessage::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("frame is not JSON")
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            other => panic!("unexpected message: {:?}", other),
        }
    }
}

/// Ping and wait for the matching pong; once it arrives the session is
/// subscribed and every frame sent before the ping has been handled
async fn sync(socket: &mut TestWebSocket, tag: &'static str) {
    socket.send_message(WsMessage::Ping(tag.into())).await;
    loop {
        match socket.receive_message().await {
            WsMessage::Pong(payload) if &payload[..] == tag.as_bytes() => return,
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            other => panic!("expected pong, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_socket_answers_ping() {
    let (server, _state) = create_ws_test_server();
    let mut socket = server.get_websocket("/api/ws").await.into_websocket().await;

    sync(&mut socket, "ping").await;
}

#[tokio::test]
async fn test_socket_forwards_event_frames() {
    let (server, state) = create_ws_test_server();
    let mut socket = server.get_websocket("/ws").await.into_websocket().await;
    sync(&mut socket, "ready").await;

    state
        .realtime
        .table_change("Socios", ChangeKind::Updated, json!({"id": 4, "nombre": "Ana"}));

    assert_eq!(
        next_frame(&mut socket).await,
        json!({"event": "Socios_updated", "data": {"id": 4, "nombre": "Ana"}})
    );
}

#[tokio::test]
async fn test_socket_filters_rooms() {
    let (server, state) = create_ws_test_server();
    let mut socket = server.get_websocket("/api/ws").await.into_websocket().await;

    socket
        .send_text(json!({"event": "join-room", "data": "tesoreria"}).to_string())
        .await;
    socket.send_text("no es json").await;
    sync(&mut socket, "joined").await;

    let hub = &state.realtime;
    hub.table_change_in_room("caja", "Pagos", ChangeKind::Created, json!({"id": 1}));
    hub.table_change_in_room("tesoreria", "Pagos", ChangeKind::Created, json!({"id": 2}));
    hub.table_change("Recibos", ChangeKind::Deleted, json!({"id": 3}));

    assert_eq!(
        next_frame(&mut socket).await,
        json!({"event": "Pagos_created", "data": {"id": 2}})
    );
    assert_eq!(
        next_frame(&mut socket).await,
        json!({"event": "Recibos_deleted", "data": {"id": 3}})
    );

    socket
        .send_text(json!({"event": "leave-room", "data": "tesoreria"}).to_string())
        .await;
    sync(&mut socket, "left").await;

    hub.table_change_in_room("tesoreria", "Pagos", ChangeKind::Created, json!({"id": 4}));
    hub.table_change("Pagos", ChangeKind::Created, json!({"id": 5}));

    assert_eq!(
        next_frame(&mut socket).await,
        json!({"event": "Pagos_created", "data": {"id": 5}})
    );
}

#[tokio::test]
#[serial]
async fn test_socket_receives_table_mutations() {
    let Some(_db) = TestDatabase::connect().await else { return };
    let (server, _state) = create_ws_test_server();
    let mut socket = server.get_websocket("/api/ws").await.into_websocket().await;

    socket
        .send_text(json!({"event": "join-room", "data": "cortejo-2025"}).to_string())
        .await;
    sync(&mut socket, "subscribed").await;

    let response = server
        .post("/api/table/Cortejos")
        .json(&json!({"nombre": "Reyes"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let record = response.json::<Value>()["record"].clone();

    assert_eq!(
        next_frame(&mut socket).await,
        json!({"event": "Cortejos_created", "data": record})
    );

    let id = record["id"].as_i64().unwrap();
    server.delete(&format!("/api/table/Cortejos/{}", id)).await;

    assert_eq!(
        next_frame(&mut socket).await,
        json!({"event": "Cortejos_deleted", "data": {"id": id}})
    );
}
