//! Real-time hub tests

use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;
use tokio::sync::broadcast::error::TryRecvError;

use cabalgata::backend::realtime::socket::{ClientSession, FrameOutcome};
use cabalgata::backend::realtime::RealtimeHub;
use cabalgata::shared::ChangeKind;

use crate::common::{create_test_server_with, TestDatabase};

#[tokio::test]
async fn test_every_subscriber_receives_event() {
    let hub = RealtimeHub::default();
    let mut first = hub.subscribe();
    let mut second = hub.subscribe();

    let reached = hub.table_change("Socios", ChangeKind::Created, json!({"id": 1}));

    assert_eq!(reached, 2);
    assert_eq!(first.recv().await.unwrap().event, "Socios_created");
    assert_eq!(second.recv().await.unwrap().event, "Socios_created");
}

#[tokio::test]
async fn test_late_subscriber_sees_nothing() {
    let hub = RealtimeHub::default();

    assert_eq!(hub.table_change("Socios", ChangeKind::Deleted, json!({"id": 1})), 0);

    let mut late = hub.subscribe();
    assert_eq!(late.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn test_room_events_reach_members_only() {
    let hub = RealtimeHub::default();
    let mut rx = hub.subscribe();
    let mut joined = ClientSession::new();
    let outsider = ClientSession::new();

    assert_eq!(
        joined.handle_frame(r#"{"event":"join-room","data":"cortejo-2025"}"#),
        FrameOutcome::Joined("cortejo-2025".to_string())
    );

    hub.table_change_in_room("cortejo-2025", "Carrozas", ChangeKind::Updated, json!({"id": 3}));
    hub.table_change("Carrozas", ChangeKind::Updated, json!({"id": 4}));

    let scoped = rx.recv().await.unwrap();
    assert!(joined.accepts(&scoped));
    assert!(!outsider.accepts(&scoped));

    let global = rx.recv().await.unwrap();
    assert!(joined.accepts(&global));
    assert!(outsider.accepts(&global));
}

#[tokio::test]
#[serial]
async fn test_mutations_are_mirrored() {
    let Some(_db) = TestDatabase::connect().await else { return };
    let (server, state) = create_test_server_with(&[]);
    let mut rx = state.realtime.subscribe();

    server
        .post("/api/table/Cortejos")
        .json(&json!({"nombre": "Reyes", "anio": 2025}))
        .await;
    server
        .put("/api/table/Cortejos")
        .json(&json!({"id": 1, "anio": 2026}))
        .await;
    server.delete("/api/table/Cortejos/1").await;

    let created = rx.recv().await.unwrap();
    assert_eq!(created.event, "Cortejos_created");
    assert_eq!(created.data, json!({"id": 1, "nombre": "Reyes", "anio": 2025}));

    let updated = rx.recv().await.unwrap();
    assert_eq!(updated.event, "Cortejos_updated");
    assert_eq!(updated.data, json!({"id": 1, "anio": 2026}));

    let deleted = rx.recv().await.unwrap();
    assert_eq!(deleted.event, "Cortejos_deleted");
    assert_eq!(deleted.data, json!({"id": 1}));

    // Wire shape of the frame sent to clients
    assert_eq!(
        deleted.to_frame(),
        json!({"event": "Cortejos_deleted", "data": {"id": 1}})
    );
}
