//! Generic table API integration tests

use axum::http::{header::AUTHORIZATION, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{auth_header, create_test_server, create_test_server_with, create_test_user, TestDatabase};

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = create_test_server();

    let response = server.get("/api/nada").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "message": "Ruta no encontrada"})
    );
}

#[tokio::test]
async fn test_unregistered_table_is_internal_error() {
    let server = create_test_server();

    let response = server.get("/api/table/Usuarios").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "message": "Error al obtener los registros"})
    );
}

#[tokio::test]
async fn test_secondary_lookup_on_unsupported_table() {
    let server = create_test_server();

    let response = server.get("/api/tableSecondary/Socios/1").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Tabla no soportada para consulta secundaria");
}

#[tokio::test]
async fn test_create_rejects_non_object_body() {
    let server = create_test_server();

    let response = server.post("/api/table/Socios").json(&json!([1, 2, 3])).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["message"], "Error al crear el registro");
}

#[tokio::test]
async fn test_create_rejects_unknown_column() {
    let server = create_test_server();

    let response = server
        .post("/api/table/Socios")
        .json(&json!({"nombre": "Ana", "password_hash": "x"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Error al crear el registro");
}

#[tokio::test]
async fn test_update_requires_id() {
    let server = create_test_server();

    let response = server.put("/api/table/Socios").json(&json!({"nombre": "Ana"})).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["message"], "Error al actualizar el registro");
}

#[tokio::test]
async fn test_mutations_need_token_when_configured() {
    let (server, _) = create_test_server_with(&[("REQUIRE_AUTH_FOR_MUTATIONS", "true")]);

    let response = server.post("/api/table/Socios").json(&json!({"nombre": "Ana"})).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Token no proporcionado");

    let response = server.put("/api/table/Socios").json(&json!({"id": 1})).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server.delete("/api/table/Socios/1").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .delete("/api/table/Socios/1")
        .add_header(AUTHORIZATION, auth_header("not-a-jwt"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Token inválido");

    // Reads stay open: the failure is the unregistered table, not the token
    let response = server.get("/api/table/Usuarios").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_mutations_are_open_by_default() {
    let server = create_test_server();

    // Reaches the handler and fails on the body, not on authentication
    let response = server.post("/api/table/Socios").json(&json!("texto")).await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
#[serial]
async fn test_crud_round() {
    let Some(_db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let response = server
        .post("/api/table/Socios")
        .json(&json!({"nombre": "Ana", "apellidos": "Pérez", "zona": "Norte"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Registro creado correctamente");
    assert_eq!(
        body["record"],
        json!({"id": 1, "nombre": "Ana", "apellidos": "Pérez", "zona": "Norte"})
    );

    let rows: Value = server.get("/api/table/Socios/1").await.json();
    assert_eq!(rows[0]["nombre"], "Ana");
    assert_eq!(rows[0]["zona"], "Norte");

    let response = server
        .put("/api/table/Socios")
        .json(&json!({"id": 1, "nombre": "Ana María", "zona": "Sur"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Registro actualizado correctamente");
    assert_eq!(body["record"], json!({"id": 1, "nombre": "Ana María", "zona": "Sur"}));

    let rows: Value = server.get("/api/table/Socios").await.json();
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["nombre"], "Ana María");
    assert_eq!(rows[0]["apellidos"], "Pérez");

    let response = server.delete("/api/table/Socios/1").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "success": true,
            "message": "Registro eliminado correctamente",
            "record": {"id": 1},
            "cascadeDeleted": {"parientes": 0}
        })
    );

    let rows: Value = server.get("/api/table/Socios/1").await.json();
    assert_eq!(rows, json!([]));
}

#[tokio::test]
#[serial]
async fn test_empty_body_inserts_defaults() {
    let Some(_db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let response = server.post("/api/table/Pagos").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["record"], json!({"id": 1}));
}

#[tokio::test]
#[serial]
async fn test_secondary_and_tipo_lookups() {
    let Some(db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let cortejo = db.insert("Cortejos", json!({"nombre": "Reyes", "anio": 2025})).await;
    let otro = db.insert("Cortejos", json!({"nombre": "Pajes", "anio": 2025})).await;
    db.insert("Carrozas", json!({"cortejo_id": cortejo, "nombre": "Melchor"})).await;
    db.insert("Carrozas", json!({"cortejo_id": cortejo, "nombre": "Gaspar"})).await;
    db.insert("Carrozas", json!({"cortejo_id": otro, "nombre": "Estrella"})).await;

    let rows: Value = server
        .get(&format!("/api/tableSecondary/Carrozas/{}", cortejo))
        .await
        .json();
    let nombres: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(nombres, vec!["Melchor", "Gaspar"]);

    let socio = db.insert("Socios", json!({"nombre": "Ana"})).await;
    db.insert("Recibos", json!({"socio_id": socio, "tipo": "cuota", "importe": "25.50"})).await;
    db.insert("Recibos", json!({"socio_id": socio, "tipo": "donativo", "importe": 10})).await;

    let rows: Value = server.get("/api/tipoRecibo/Recibos/cuota").await.json();
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["tipo"], "cuota");
    assert_eq!(rows[0]["importe"], json!(25.50));
}

#[tokio::test]
#[serial]
async fn test_malformed_id_is_internal_error() {
    let Some(_db) = TestDatabase::connect().await else { return };
    let server = create_test_server();

    let response = server.get("/api/table/Socios/abc").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["message"], "Error al obtener el registro");
}

#[tokio::test]
#[serial]
async fn test_guarded_mutation_with_token() {
    let Some(db) = TestDatabase::connect().await else { return };
    let (server, _) = create_test_server_with(&[("REQUIRE_AUTH_FOR_MUTATIONS", "true")]);
    let user = create_test_user(db.pool(), "tesorero", "contraseña-segura").await;

    let response = server
        .post("/api/table/Cortejos")
        .add_header(AUTHORIZATION, auth_header(&user.token))
        .json(&json!({"nombre": "Reyes"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
}
