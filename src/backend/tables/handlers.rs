/**
 * Generic Table Handlers
 *
 * One CRUD surface for every registered table:
 *
 * | Method | Path                              | Handler          |
 * |--------|-----------------------------------|------------------|
 * | GET    | `/api/table/{table}`              | `get_all`        |
 * | GET    | `/api/table/{table}/{id}`         | `get_by_id`      |
 * | GET    | `/api/tableSecondary/{table}/{id}`| `get_secondary`  |
 * | GET    | `/api/tipoRecibo/{table}/{tipo}`  | `get_by_tipo`    |
 * | POST   | `/api/table/{table}`              | `create_record`  |
 * | PUT    | `/api/table/{table}`              | `update_record`  |
 * | DELETE | `/api/table/{table}/{id}`         | `delete_record`  |
 *
 * Reads answer the bare row array; an absent row is an empty array, not a
 * 404. Every mutation is mirrored to real-time clients after it succeeds.
 * Any failure is a 500 carrying the operation's Spanish message; the cause
 * is only logged.
 */

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{Map, Value};

use crate::backend::db::gateway::Row;
use crate::backend::db::registry::{lookup, CARROZAS, SOCIOS_CARROZAS};
use crate::backend::db::Database;
use crate::backend::error::{BackendError, BackendResult, Context};
use crate::backend::realtime::RealtimeHub;
use crate::backend::tables::cascade::delete_with_cascade;
use crate::backend::tables::queries::{self, id_value, Statement};
use crate::shared::api::{DeleteResponse, MutationResponse};
use crate::shared::{ChangeKind, RealtimeEvent};

pub const UNSUPPORTED_SECONDARY: &str = "Tabla no soportada para consulta secundaria";

/// Foreign key used by the secondary lookup of `table`
pub fn secondary_column(table: &str) -> Option<&'static str> {
    match table {
        CARROZAS => Some("cortejo_id"),
        SOCIOS_CARROZAS => Some("carroza_id"),
        _ => None,
    }
}

fn into_object(body: Result<Json<Value>, JsonRejection>) -> BackendResult<Map<String, Value>> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(other)) => Err(BackendError::InvalidBody(format!(
            "se esperaba un objeto JSON, no {}",
            other
        ))),
        Err(rejection) => Err(BackendError::InvalidBody(rejection.body_text())),
    }
}

async fn fetch(db: &Database, statement: &Statement, label: &str) -> BackendResult<Vec<Row>> {
    Ok(db.fetch_rows(&statement.template, &statement.params, label).await?)
}

/// GET /api/table/{table}/{id}
pub async fn get_by_id(
    State(db): State<Database>,
    Path((table, id)): Path<(String, String)>,
) -> BackendResult<Json<Vec<Row>>> {
    const ERROR: &str = "Error al obtener el registro";

    let schema = lookup(&table).during(ERROR)?;
    let statement = queries::select_by_id(schema, &id).during(ERROR)?;
    let rows = fetch(&db, &statement, &format!("Error leyendo {} {}", table, id))
        .await
        .during(ERROR)?;
    Ok(Json(rows))
}

/// GET /api/table/{table}
pub async fn get_all(
    State(db): State<Database>,
    Path(table): Path<String>,
) -> BackendResult<Json<Vec<Row>>> {
    const ERROR: &str = "Error al obtener los registros";

    let schema = lookup(&table).during(ERROR)?;
    let statement = queries::select_all(schema);
    let rows = fetch(&db, &statement, &format!("Error leyendo {}", table))
        .await
        .during(ERROR)?;
    tracing::debug!("[Tables] {} rows from {}", rows.len(), table);
    Ok(Json(rows))
}

/// GET /api/tableSecondary/{table}/{id}
///
/// Floats of a procession, or seat assignments of a float.
pub async fn get_secondary(
    State(db): State<Database>,
    Path((table, id)): Path<(String, String)>,
) -> BackendResult<Json<Vec<Row>>> {
    const ERROR: &str = "Error al obtener los registros relacionados";

    let column = secondary_column(&table)
        .ok_or_else(|| BackendError::handler(StatusCode::BAD_REQUEST, UNSUPPORTED_SECONDARY))?;
    let schema = lookup(&table).during(ERROR)?;
    let statement = queries::select_where(schema, column, &id).during(ERROR)?;
    let rows = fetch(&db, &statement, &format!("Error leyendo {} por {}", table, column))
        .await
        .during(ERROR)?;
    Ok(Json(rows))
}

/// GET /api/tipoRecibo/{table}/{tipo}
pub async fn get_by_tipo(
    State(db): State<Database>,
    Path((table, tipo)): Path<(String, String)>,
) -> BackendResult<Json<Vec<Row>>> {
    const ERROR: &str = "Error al obtener los registros por tipo";

    let schema = lookup(&table).during(ERROR)?;
    let statement = queries::select_where(schema, "tipo", &tipo).during(ERROR)?;
    let rows = fetch(&db, &statement, &format!("Error leyendo {} de tipo {}", table, tipo))
        .await
        .during(ERROR)?;
    Ok(Json(rows))
}

/// POST /api/table/{table}
///
/// The record in the response and the event is the generated id merged
/// with the submitted fields.
pub async fn create_record(
    State(db): State<Database>,
    State(hub): State<RealtimeHub>,
    Path(table): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> BackendResult<(StatusCode, Json<MutationResponse>)> {
    const ERROR: &str = "Error al crear el registro";

    let body = into_object(body).during(ERROR)?;
    let schema = lookup(&table).during(ERROR)?;
    let statement = queries::insert(schema, &body).during(ERROR)?;
    let rows = fetch(&db, &statement, &format!("Error insertando en {}", table))
        .await
        .during(ERROR)?;

    let id = rows
        .first()
        .and_then(|row| row.get("id"))
        .cloned()
        .unwrap_or(Value::Null);

    let mut record = Map::new();
    record.insert("id".to_string(), id);
    for (key, value) in body {
        record.insert(key, value);
    }
    let record = Value::Object(record);

    tracing::info!("[Tables] Created {} {}", table, record["id"]);
    hub.table_change(schema.name, ChangeKind::Created, record.clone());

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::ok("Registro creado correctamente", record)),
    ))
}

/// PUT /api/table/{table}
///
/// The body must carry `id`; every field of the body is written.
pub async fn update_record(
    State(db): State<Database>,
    State(hub): State<RealtimeHub>,
    Path(table): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> BackendResult<Json<MutationResponse>> {
    const ERROR: &str = "Error al actualizar el registro";

    let body = into_object(body).during(ERROR)?;
    let schema = lookup(&table).during(ERROR)?;
    let statement = queries::update(schema, &body).during(ERROR)?;
    let affected = db
        .execute(&statement.template, &statement.params, &format!("Error actualizando {}", table))
        .await
        .during(ERROR)?;

    let record = Value::Object(body);
    tracing::info!("[Tables] Updated {} {} ({} rows)", table, record["id"], affected);
    hub.table_change(schema.name, ChangeKind::Updated, record.clone());

    Ok(Json(MutationResponse::ok("Registro actualizado correctamente", record)))
}

/// DELETE /api/table/{table}/{id}
///
/// Deleting an id that does not exist still succeeds with zero counts.
pub async fn delete_record(
    State(db): State<Database>,
    State(hub): State<RealtimeHub>,
    Path((table, id)): Path<(String, String)>,
) -> BackendResult<Json<DeleteResponse>> {
    const ERROR: &str = "Error al eliminar el registro";

    let schema = lookup(&table).during(ERROR)?;
    let outcome = delete_with_cascade(&db, schema, &id).await.during(ERROR)?;

    let id = id_value(&id);
    if outcome.deleted == 0 {
        tracing::debug!("[Tables] Delete of {} {} matched no row", table, id);
    }

    // Primary event first, then the cascade leaf-first.
    hub.emit(RealtimeEvent::deleted(schema.name, id.clone()));
    for event in outcome.events {
        hub.emit(event);
    }

    Ok(Json(DeleteResponse {
        success: true,
        message: "Registro eliminado correctamente".to_string(),
        record: serde_json::json!({ "id": id }),
        cascade_deleted: outcome.cascade_deleted,
    }))
}
