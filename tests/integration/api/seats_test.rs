//! Seat availability and assignment listing tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{create_test_server, TestDatabase};

#[tokio::test]
async fn test_check_seat_with_missing_fields() {
    let server = create_test_server();

    let response = server
        .post("/api/socios-carrozas/verificar-sitio")
        .json(&json!({"carroza_id": 1}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "message": "Error al verificar el sitio"})
    );
}

#[tokio::test]
async fn test_check_seat_with_null_float() {
    let server = create_test_server();

    let response = server
        .post("/api/socios-carrozas/verificar-sitio")
        .json(&json!({"carroza_id": null, "sitio": "4", "tipo_usuario": "carroza"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "message": "Error al verificar el sitio"})
    );
}

#[tokio::test]
#[serial]
async fn test_check_seat() {
    let Some(db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let cortejo = db.insert("Cortejos", json!({"nombre": "Reyes"})).await;
    let carroza = db.insert("Carrozas", json!({"cortejo_id": cortejo, "nombre": "Melchor"})).await;
    let socio = db.insert("Socios", json!({"nombre": "Ana"})).await;
    db.insert(
        "Socios_Carrozas",
        json!({"socio_id": socio, "carroza_id": carroza, "tipo_usuario": "carroza", "sitio": "4"}),
    )
    .await;

    let check = |sitio: &str, tipo: &str| {
        json!({"carroza_id": carroza, "sitio": sitio, "tipo_usuario": tipo})
    };

    let taken: Value = server
        .post("/api/socios-carrozas/verificar-sitio")
        .json(&check("4", "carroza"))
        .await
        .json();
    assert_eq!(taken, json!({"disponible": false}));

    // Same number, other category
    let free: Value = server
        .post("/api/socios-carrozas/verificar-sitio")
        .json(&check("4", "beduino"))
        .await
        .json();
    assert_eq!(free, json!({"disponible": true}));

    let free: Value = server
        .post("/api/socios-carrozas/verificar-sitio")
        .json(&check("5", "carroza"))
        .await
        .json();
    assert_eq!(free, json!({"disponible": true}));
}

#[tokio::test]
#[serial]
async fn test_assignment_listing() {
    let Some(db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let cortejo = db.insert("Cortejos", json!({"nombre": "Reyes"})).await;
    let melchor = db.insert("Carrozas", json!({"cortejo_id": cortejo, "nombre": "Melchor"})).await;
    let gaspar = db.insert("Carrozas", json!({"cortejo_id": cortejo, "nombre": "Gaspar"})).await;
    let socio = db
        .insert("Socios", json!({"nombre": "Ana", "apellidos": "Pérez"}))
        .await;
    let pariente = db
        .insert(
            "Parientes",
            json!({"socio_id": socio, "nombre": "Luis", "apellidos": "Pérez", "tipo": "hijo"}),
        )
        .await;

    let assign = |carroza: i64, sitio: String| {
        json!({"socio_id": socio, "carroza_id": carroza, "tipo_usuario": "carroza", "sitio": sitio})
    };
    db.insert("Socios_Carrozas", assign(gaspar, "1".into())).await;
    db.insert("Socios_Carrozas", assign(melchor, "10".into())).await;
    db.insert("Socios_Carrozas", assign(melchor, format!("2_p{}", pariente))).await;
    db.insert("Socios_Carrozas", assign(melchor, "pasillo".into())).await;

    let response = server.get("/api/debug/asignaciones").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 4);

    let listed: Vec<(i64, Value)> = body["asignaciones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| (a["carroza_id"].as_i64().unwrap(), a["sitio"].clone()))
        .collect();
    assert_eq!(
        listed,
        vec![
            (melchor, json!("pasillo")),
            (melchor, json!(format!("2_p{}", pariente))),
            (melchor, json!("10")),
            (gaspar, json!("1")),
        ]
    );

    let relative = &body["asignaciones"][1];
    assert_eq!(relative["carroza_nombre"], "Melchor");
    assert_eq!(relative["socio_nombre"], "Ana Pérez");
    assert_eq!(relative["asiento"], 2);
    assert_eq!(
        relative["ocupante"],
        json!({"tipo": "pariente", "id": pariente, "nombre": "Luis Pérez"})
    );

    let member = &body["asignaciones"][2];
    assert_eq!(
        member["ocupante"],
        json!({"tipo": "socio", "id": socio, "nombre": "Ana Pérez"})
    );

    let malformed = &body["asignaciones"][0];
    assert_eq!(malformed["asiento"], Value::Null);
    assert_eq!(malformed["ocupante"], Value::Null);
}
