//! Cascade delete tests against PostgreSQL

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{create_test_server, create_test_server_with, TestDatabase};

/// Drain every event already buffered on the receiver
fn drain(rx: &mut tokio::sync::broadcast::Receiver<cabalgata::shared::RealtimeEvent>) -> Vec<(String, Value)> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push((event.event, event.data));
    }
    events
}

#[tokio::test]
#[serial]
async fn test_cortejo_cascade() {
    let Some(db) = TestDatabase::connect().await else { return };
    let (server, state) = create_test_server_with(&[]);

    let cortejo = db.insert("Cortejos", json!({"nombre": "Reyes"})).await;
    let keep = db.insert("Cortejos", json!({"nombre": "Pajes"})).await;
    let socio = db.insert("Socios", json!({"nombre": "Ana"})).await;
    let c1 = db.insert("Carrozas", json!({"cortejo_id": cortejo, "nombre": "Melchor"})).await;
    let c2 = db.insert("Carrozas", json!({"cortejo_id": cortejo, "nombre": "Gaspar"})).await;
    let other = db.insert("Carrozas", json!({"cortejo_id": keep, "nombre": "Estrella"})).await;

    let mut assignments = Vec::new();
    for (carroza, sitio) in [(c1, "1"), (c1, "2"), (c2, "1")] {
        let id = db
            .insert(
                "Socios_Carrozas",
                json!({"socio_id": socio, "carroza_id": carroza, "tipo_usuario": "carroza", "sitio": sitio}),
            )
            .await;
        assignments.push(id);
    }
    let untouched = db
        .insert(
            "Socios_Carrozas",
            json!({"socio_id": socio, "carroza_id": other, "tipo_usuario": "beduino", "sitio": "1"}),
        )
        .await;

    let mut rx = state.realtime.subscribe();
    let response = server.delete(&format!("/api/table/Cortejos/{}", cortejo)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["cascadeDeleted"], json!({"carrozas": 2, "asignaciones": 3}));
    assert_eq!(body["record"], json!({"id": cortejo}));

    assert_eq!(db.count_where("Carrozas", "cortejo_id", cortejo).await, 0);
    assert_eq!(db.count_where("Socios_Carrozas", "carroza_id", c1).await, 0);
    assert_eq!(db.count_where("Socios_Carrozas", "carroza_id", c2).await, 0);
    assert_eq!(db.count_where("Socios_Carrozas", "id", untouched).await, 1);
    assert_eq!(db.count_where("Carrozas", "id", other).await, 1);

    // Primary first, then assignments, then floats, each with its real id
    let events = drain(&mut rx);
    let mut expected = vec![("Cortejos_deleted".to_string(), json!({"id": cortejo}))];
    expected.extend(
        assignments
            .iter()
            .map(|id| ("Socios_Carrozas_deleted".to_string(), json!({"id": id}))),
    );
    expected.push(("Carrozas_deleted".to_string(), json!({"id": c1})));
    expected.push(("Carrozas_deleted".to_string(), json!({"id": c2})));

    let mut sorted = events.clone();
    sorted[1..4].sort_by_key(|(_, data)| data["id"].as_i64());
    sorted[4..].sort_by_key(|(_, data)| data["id"].as_i64());
    assert_eq!(sorted, expected);
}

#[tokio::test]
#[serial]
async fn test_carroza_cascade() {
    let Some(db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let cortejo = db.insert("Cortejos", json!({"nombre": "Reyes"})).await;
    let carroza = db.insert("Carrozas", json!({"cortejo_id": cortejo, "nombre": "Baltasar"})).await;
    let socio = db.insert("Socios", json!({"nombre": "Ana"})).await;
    for sitio in ["1", "2"] {
        db.insert(
            "Socios_Carrozas",
            json!({"socio_id": socio, "carroza_id": carroza, "tipo_usuario": "beduino", "sitio": sitio}),
        )
        .await;
    }

    let body: Value = server
        .delete(&format!("/api/table/Carrozas/{}", carroza))
        .await
        .json();

    assert_eq!(body["cascadeDeleted"], json!({"asignaciones": 2}));
    assert_eq!(db.count_where("Socios_Carrozas", "carroza_id", carroza).await, 0);
    assert_eq!(db.count_where("Cortejos", "id", cortejo).await, 1);
}

#[tokio::test]
#[serial]
async fn test_socio_delete_renumbers_members() {
    let Some(db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let ana = db.insert("Socios", json!({"nombre": "Ana"})).await;
    let blas = db.insert("Socios", json!({"nombre": "Blas"})).await;
    let carla = db.insert("Socios", json!({"nombre": "Carla"})).await;
    assert_eq!((ana, blas, carla), (1, 2, 3));

    db.insert("Parientes", json!({"socio_id": blas, "nombre": "Hijo de Blas"})).await;
    db.insert("Parientes", json!({"socio_id": blas, "nombre": "Hija de Blas"})).await;
    db.insert("Parientes", json!({"socio_id": carla, "nombre": "Hijo de Carla"})).await;
    db.insert("Recibos", json!({"socio_id": carla, "tipo": "cuota"})).await;

    let response = server.delete("/api/table/Socios/2").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["cascadeDeleted"], json!({"parientes": 2}));

    // Carla moved down to 2 and her dependents followed
    assert_eq!(db.ids("Socios").await, vec![1, 2]);
    let rows: Value = server.get("/api/table/Socios/2").await.json();
    assert_eq!(rows[0]["nombre"], "Carla");
    assert_eq!(db.count_where("Parientes", "socio_id", 2).await, 1);
    assert_eq!(db.count_where("Recibos", "socio_id", 2).await, 1);
    assert_eq!(db.count_where("Parientes", "socio_id", 3).await, 0);

    // The sequence continues right after the highest id
    let created: Value = server
        .post("/api/table/Socios")
        .json(&json!({"nombre": "Diego"}))
        .await
        .json();
    assert_eq!(created["record"]["id"], 3);
}

#[tokio::test]
#[serial]
async fn test_socio_renumbering_leaves_negative_ids_alone() {
    let Some(db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    for nombre in ["Ana", "Blas", "Carla"] {
        db.insert("Socios", json!({"nombre": nombre})).await;
    }
    // Manually numbered members, one of them where the old id of Carla would land
    for (id, nombre) in [(-7, "Neg"), (-2, "Otro")] {
        let response = server
            .post("/api/table/Socios")
            .json(&json!({"id": id, "nombre": nombre}))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }
    db.insert("Parientes", json!({"socio_id": -7, "nombre": "Hijo de Neg"})).await;
    db.insert("Parientes", json!({"socio_id": 3, "nombre": "Hijo de Carla"})).await;

    let response = server.delete("/api/table/Socios/2").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    assert_eq!(db.ids("Socios").await, vec![-7, -2, 1, 2]);
    let rows: Value = server.get("/api/table/Socios/-7").await.json();
    assert_eq!(rows[0]["nombre"], "Neg");
    let rows: Value = server.get("/api/table/Socios/2").await.json();
    assert_eq!(rows[0]["nombre"], "Carla");
    assert_eq!(db.count_where("Parientes", "socio_id", -7).await, 1);
    assert_eq!(db.count_where("Parientes", "socio_id", 2).await, 1);

    let created: Value = server
        .post("/api/table/Socios")
        .json(&json!({"nombre": "Diego"}))
        .await
        .json();
    assert_eq!(created["record"]["id"], 3);
}

#[tokio::test]
#[serial]
async fn test_delete_missing_ids_succeeds() {
    let Some(_db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let expected = [
        ("Socios", json!({"parientes": 0})),
        ("Cortejos", json!({"carrozas": 0, "asignaciones": 0})),
        ("Carrozas", json!({"asignaciones": 0})),
        ("Recibos", json!({})),
    ];
    for (table, cascade) in expected {
        let response = server.delete(&format!("/api/table/{}/999", table)).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{}", table);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["cascadeDeleted"], cascade, "{}", table);
    }
}
