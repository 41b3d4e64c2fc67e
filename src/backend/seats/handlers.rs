/**
 * Seat Handlers
 *
 * `check_seat` answers whether a seat of a given category is still free on
 * a float. `list_assignments` joins every assignment with its float and
 * member, decodes the seat and resolves relative-occupied seats against
 * `Parientes`. A seat string that does not decode is listed with a null
 * seat and occupant instead of failing the listing.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::backend::db::gateway::{Param, Row, SqlValue};
use crate::backend::db::registry::{lookup, CARROZAS, PARIENTES, SOCIOS, SOCIOS_CARROZAS};
use crate::backend::db::Database;
use crate::backend::error::{BackendError, BackendResult, Context};
use crate::shared::api::{SeatAvailability, SeatCheckRequest};
use crate::shared::{Occupant, SeatRef};

/// Occupant of a listed seat with its resolved name
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OccupantView {
    #[serde(flatten)]
    pub occupant: Occupant,
    pub nombre: Option<String>,
}

/// One row of the diagnostic listing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Assignment {
    pub id: i64,
    pub carroza_id: Option<i64>,
    pub carroza_nombre: Option<String>,
    pub socio_id: Option<i64>,
    pub socio_nombre: Option<String>,
    pub tipo_usuario: Option<String>,
    pub sitio: Option<String>,
    /// Decoded seat number
    pub asiento: Option<u32>,
    pub ocupante: Option<OccupantView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentListing {
    pub success: bool,
    pub total: usize,
    pub asignaciones: Vec<Assignment>,
}

/// POST /api/socios-carrozas/verificar-sitio
pub async fn check_seat(
    State(db): State<Database>,
    body: Result<Json<SeatCheckRequest>, JsonRejection>,
) -> BackendResult<Json<SeatAvailability>> {
    const ERROR: &str = "Error al verificar el sitio";

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return Err(BackendError::InvalidBody(rejection.body_text()).during(ERROR)),
    };

    // `= NULL` never matches, which would report any seat as free.
    if request.carroza_id.is_null() {
        return Err(BackendError::InvalidBody("carroza_id is null".to_string()).during(ERROR));
    }

    let table = lookup(SOCIOS_CARROZAS).during(ERROR)?;
    let carroza_id = table.column("carroza_id").during(ERROR)?;
    let params = [
        Param::ident("id"),
        Param::ident(table.name),
        Param::ident(carroza_id.name),
        Param::value(carroza_id.bind(&request.carroza_id).during(ERROR)?),
        Param::ident("sitio"),
        Param::value(SqlValue::text(request.sitio.as_str())),
        Param::ident("tipo_usuario"),
        Param::value(SqlValue::text(request.tipo_usuario.as_str())),
    ];
    let rows = db
        .fetch_rows(
            "SELECT ?? FROM ?? WHERE ?? = ? AND ?? = ? AND ?? = ? LIMIT 1",
            &params,
            "Error verificando el sitio",
        )
        .await
        .during(ERROR)?;

    let disponible = rows.is_empty();
    tracing::debug!(
        "[Seats] Seat {} ({}) on float {}: {}",
        request.sitio,
        request.tipo_usuario,
        request.carroza_id,
        if disponible { "free" } else { "taken" }
    );
    Ok(Json(SeatAvailability { disponible }))
}

fn int(row: &Row, key: &str) -> Option<i64> {
    row.get(key).and_then(Value::as_i64)
}

fn text(row: &Row, key: &str) -> Option<String> {
    row.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Decode one joined row; relative names are filled in afterwards
fn decode_assignment(row: &Row) -> Assignment {
    let sitio = text(row, "sitio");
    let socio_id = int(row, "socio_id");
    let seat = sitio.as_deref().and_then(|s| match s.parse::<SeatRef>() {
        Ok(seat) => Some(seat),
        Err(e) => {
            tracing::warn!("[Seats] {}", e);
            None
        }
    });

    let ocupante = seat.and_then(|seat| match seat.relative {
        Some(pariente_id) => Some(OccupantView {
            occupant: Occupant::Relative(pariente_id),
            nombre: None,
        }),
        None => socio_id.map(|id| OccupantView {
            occupant: seat.occupant(id),
            nombre: text(row, "socio_nombre"),
        }),
    });

    Assignment {
        id: int(row, "id").unwrap_or_default(),
        carroza_id: int(row, "carroza_id"),
        carroza_nombre: text(row, "carroza_nombre"),
        socio_id,
        socio_nombre: text(row, "socio_nombre"),
        tipo_usuario: text(row, "tipo_usuario"),
        sitio,
        asiento: seat.map(|seat| seat.seat),
        ocupante,
    }
}

fn relative_ids(assignments: &[Assignment]) -> Vec<i64> {
    let mut ids: Vec<i64> = assignments
        .iter()
        .filter_map(|a| match a.ocupante.as_ref()?.occupant {
            Occupant::Relative(id) => Some(id),
            Occupant::Member(_) => None,
        })
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn sort_assignments(assignments: &mut [Assignment]) {
    assignments.sort_by(|a, b| {
        (a.carroza_id, a.asiento, &a.sitio, a.id).cmp(&(b.carroza_id, b.asiento, &b.sitio, b.id))
    });
}

/// GET /api/debug/asignaciones
pub async fn list_assignments(State(db): State<Database>) -> BackendResult<Json<AssignmentListing>> {
    const ERROR: &str = "Error al obtener las asignaciones";

    let rows = db
        .fetch_rows(
            "SELECT sc.??, sc.??, c.?? AS carroza_nombre, sc.??, \
             concat_ws(' ', s.??, s.??) AS socio_nombre, sc.??, sc.?? \
             FROM ?? sc LEFT JOIN ?? c ON c.?? = sc.?? LEFT JOIN ?? s ON s.?? = sc.??",
            &[
                Param::ident("id"),
                Param::ident("carroza_id"),
                Param::ident("nombre"),
                Param::ident("socio_id"),
                Param::ident("nombre"),
                Param::ident("apellidos"),
                Param::ident("tipo_usuario"),
                Param::ident("sitio"),
                Param::ident(SOCIOS_CARROZAS),
                Param::ident(CARROZAS),
                Param::ident("id"),
                Param::ident("carroza_id"),
                Param::ident(SOCIOS),
                Param::ident("id"),
                Param::ident("socio_id"),
            ],
            "Error listando las asignaciones",
        )
        .await
        .during(ERROR)?;

    let mut asignaciones: Vec<Assignment> = rows.iter().map(decode_assignment).collect();

    let relatives = relative_ids(&asignaciones);
    if !relatives.is_empty() {
        let names: HashMap<i64, String> = db
            .fetch_rows(
                "SELECT ??, concat_ws(' ', ??, ??) AS nombre FROM ?? WHERE ?? = ANY(?)",
                &[
                    Param::ident("id"),
                    Param::ident("nombre"),
                    Param::ident("apellidos"),
                    Param::ident(PARIENTES),
                    Param::ident("id"),
                    Param::value(SqlValue::integer_array(&relatives)),
                ],
                "Error resolviendo los parientes",
            )
            .await
            .during(ERROR)?
            .iter()
            .filter_map(|row| Some((int(row, "id")?, text(row, "nombre")?)))
            .collect();

        for assignment in &mut asignaciones {
            if let Some(view) = assignment.ocupante.as_mut() {
                if let Occupant::Relative(id) = view.occupant {
                    view.nombre = names.get(&id).cloned();
                }
            }
        }
    }

    sort_assignments(&mut asignaciones);
    Ok(Json(AssignmentListing {
        success: true,
        total: asignaciones.len(),
        asignaciones,
    }))
}
