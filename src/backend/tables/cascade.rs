/**
 * Cascade Deletes
 *
 * Deleting a parent row removes its dependents first so no orphan is left
 * behind. The whole cascade runs in one transaction: either every level is
 * gone or nothing is.
 *
 * | Parent     | Removed first                                       |
 * |------------|-----------------------------------------------------|
 * | `Socios`   | its `Parientes`; then the member ids are compacted  |
 * | `Cortejos` | assignments of its floats, then its `Carrozas`      |
 * | `Carrozas` | its `Socios_Carrozas` assignments                   |
 *
 * Every removed row yields one `<table>_deleted` event carrying its id. The
 * events are returned to the caller and only emitted after commit, so
 * clients never hear about a delete that was rolled back.
 */

use crate::backend::db::gateway::{self, row_ids, Database, DatabaseError, Param, Row};
use crate::backend::db::registry::{
    lookup, TableSchema, CARROZAS, CORTEJOS, PARIENTES, SOCIOS, SOCIOS_CARROZAS,
};
use crate::backend::error::BackendResult;
use crate::backend::tables::queries;
use crate::shared::RealtimeEvent;
use sqlx::PgConnection;
use std::collections::BTreeMap;

/// Which dependents go with a row of a given table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadePolicy {
    /// Relatives go, then member ids are renumbered
    Socio,
    /// Floats go, their assignments first
    Cortejo,
    /// Seat assignments go
    Carroza,
    /// Only the row itself
    Plain,
}

impl CascadePolicy {
    pub fn for_table(table: &str) -> Self {
        match table {
            SOCIOS => Self::Socio,
            CORTEJOS => Self::Cortejo,
            CARROZAS => Self::Carroza,
            _ => Self::Plain,
        }
    }
}

/// Result of a committed delete
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    /// Rows removed from the target table (0 or 1)
    pub deleted: u64,
    /// Dependents removed, keyed by `parientes`, `carrozas`, `asignaciones`
    pub cascade_deleted: BTreeMap<String, u64>,
    /// One event per removed dependent, leaf tables first
    pub events: Vec<RealtimeEvent>,
    /// Members whose id moved down by one
    pub renumbered: u64,
}

impl DeleteOutcome {
    fn record_dependents(&mut self, key: &str, table: &str, rows: &[Row]) {
        self.cascade_deleted.insert(key.to_string(), rows.len() as u64);
        self.events.extend(
            row_ids(rows)
                .into_iter()
                .map(|id| RealtimeEvent::deleted(table, id.into())),
        );
    }
}

/// Delete one row of `table` together with its dependents
pub async fn delete_with_cascade(
    db: &Database,
    table: &TableSchema,
    id: &str,
) -> BackendResult<DeleteOutcome> {
    let policy = CascadePolicy::for_table(table.name);
    let mut tx = db.begin("Error iniciando la transacción de borrado").await?;

    let outcome = match policy {
        CascadePolicy::Socio => delete_socio(&mut tx, table, id).await?,
        CascadePolicy::Cortejo => delete_cortejo(&mut tx, table, id).await?,
        CascadePolicy::Carroza => delete_carroza(&mut tx, table, id).await?,
        CascadePolicy::Plain => {
            let mut outcome = DeleteOutcome::default();
            outcome.deleted = delete_primary(&mut tx, table, id).await?;
            outcome
        }
    };

    tx.commit().await.map_err(|source| DatabaseError::Query {
        label: "Error confirmando el borrado".to_string(),
        source,
    })?;

    tracing::info!(
        "[Tables] Deleted {} {} (cascade: {:?}, renumbered: {})",
        table.name,
        id,
        outcome.cascade_deleted,
        outcome.renumbered
    );
    Ok(outcome)
}

async fn delete_primary(conn: &mut PgConnection, table: &TableSchema, id: &str) -> BackendResult<u64> {
    let statement = queries::delete_by_id(table, id)?;
    let rows = gateway::fetch_rows(
        &mut *conn,
        &statement.template,
        &statement.params,
        &format!("Error eliminando de {}", table.name),
    )
    .await?;
    Ok(rows.len() as u64)
}

async fn delete_children(
    conn: &mut PgConnection,
    child: &str,
    parent_column: &str,
    parent: &TableSchema,
    id: &str,
) -> BackendResult<Vec<Row>> {
    let child = lookup(child)?;
    let statement = queries::delete_where(child, parent_column, parent.id_column()?.bind_str(id))?;
    let rows = gateway::fetch_rows(
        &mut *conn,
        &statement.template,
        &statement.params,
        &format!("Error eliminando de {}", child.name),
    )
    .await?;
    Ok(rows)
}

async fn delete_socio(conn: &mut PgConnection, socios: &TableSchema, id: &str) -> BackendResult<DeleteOutcome> {
    let mut outcome = DeleteOutcome::default();

    // Serializes concurrent member deletes around the renumbering.
    gateway::execute(
        &mut *conn,
        "LOCK TABLE ?? IN EXCLUSIVE MODE",
        &[Param::ident(SOCIOS)],
        "Error bloqueando la tabla de socios",
    )
    .await?;

    let parientes = delete_children(conn, PARIENTES, "socio_id", socios, id).await?;
    outcome.record_dependents("parientes", PARIENTES, &parientes);

    outcome.deleted = delete_primary(conn, socios, id).await?;
    if outcome.deleted > 0 {
        outcome.renumbered = renumber_socios(conn, socios, id).await?;
    }
    Ok(outcome)
}

/// Close the gap left by a deleted member
///
/// Ids above the deleted one move down by one; children follow through
/// `ON UPDATE CASCADE`. The moved rows are first parked above every id in
/// use, then brought back by id, so neither step can collide with another
/// member (negative ids included) and only parked rows are restored.
async fn renumber_socios(conn: &mut PgConnection, socios: &TableSchema, id: &str) -> BackendResult<u64> {
    let deleted_id = socios.id_column()?.bind_str(id);

    let shift = gateway::fetch_rows(
        &mut *conn,
        "SELECT 2 * COALESCE(MAX(ABS(??)), 0) + 2 AS shift FROM ??",
        &[Param::ident("id"), Param::ident(SOCIOS)],
        "Error renumerando socios",
    )
    .await?
    .first()
    .and_then(|row| row.get("shift"))
    .and_then(serde_json::Value::as_i64)
    .unwrap_or(2);

    let parked = gateway::fetch_rows(
        &mut *conn,
        "UPDATE ?? SET ?? = ?? + ? WHERE ?? > ? RETURNING ??",
        &[
            Param::ident(SOCIOS),
            Param::ident("id"),
            Param::ident("id"),
            Param::value(gateway::SqlValue::integer(shift)),
            Param::ident("id"),
            Param::value(deleted_id),
            Param::ident("id"),
        ],
        "Error renumerando socios",
    )
    .await?;
    let parked = row_ids(&parked);

    if !parked.is_empty() {
        gateway::execute(
            &mut *conn,
            "UPDATE ?? SET ?? = ?? - ? WHERE ?? = ANY(?)",
            &[
                Param::ident(SOCIOS),
                Param::ident("id"),
                Param::ident("id"),
                Param::value(gateway::SqlValue::integer(shift + 1)),
                Param::ident("id"),
                Param::value(gateway::SqlValue::integer_array(&parked)),
            ],
            "Error renumerando socios",
        )
        .await?;
    }

    gateway::fetch_rows(
        &mut *conn,
        "SELECT setval(pg_get_serial_sequence(?, ?), COALESCE(MAX(??), 0) + 1, false) AS next_id FROM ??",
        &[
            Param::value(gateway::SqlValue::text(gateway::quote_identifier(SOCIOS))),
            Param::value(gateway::SqlValue::text("id")),
            Param::ident("id"),
            Param::ident(SOCIOS),
        ],
        "Error reiniciando la secuencia de socios",
    )
    .await?;

    Ok(parked.len() as u64)
}

async fn delete_cortejo(conn: &mut PgConnection, cortejos: &TableSchema, id: &str) -> BackendResult<DeleteOutcome> {
    let mut outcome = DeleteOutcome::default();

    let asignaciones = gateway::fetch_rows(
        &mut *conn,
        "DELETE FROM ?? WHERE ?? IN (SELECT ?? FROM ?? WHERE ?? = ?) RETURNING ??",
        &[
            Param::ident(SOCIOS_CARROZAS),
            Param::ident("carroza_id"),
            Param::ident("id"),
            Param::ident(CARROZAS),
            Param::ident("cortejo_id"),
            Param::value(cortejos.id_column()?.bind_str(id)),
            Param::ident("id"),
        ],
        "Error eliminando las asignaciones del cortejo",
    )
    .await?;
    outcome.record_dependents("asignaciones", SOCIOS_CARROZAS, &asignaciones);

    let carrozas = delete_children(conn, CARROZAS, "cortejo_id", cortejos, id).await?;
    outcome.record_dependents("carrozas", CARROZAS, &carrozas);

    outcome.deleted = delete_primary(conn, cortejos, id).await?;
    Ok(outcome)
}

async fn delete_carroza(conn: &mut PgConnection, carrozas: &TableSchema, id: &str) -> BackendResult<DeleteOutcome> {
    let mut outcome = DeleteOutcome::default();

    let asignaciones = delete_children(conn, SOCIOS_CARROZAS, "carroza_id", carrozas, id).await?;
    outcome.record_dependents("asignaciones", SOCIOS_CARROZAS, &asignaciones);

    outcome.deleted = delete_primary(conn, carrozas, id).await?;
    Ok(outcome)
}
