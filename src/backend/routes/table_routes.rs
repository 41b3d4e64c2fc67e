/**
 * Table and Seat Routes
 *
 * # Routes
 *
 * ## Generic table API
 * - `GET    /api/table/{table}` - All rows
 * - `POST   /api/table/{table}` - Insert
 * - `PUT    /api/table/{table}` - Update (body carries `id`)
 * - `GET    /api/table/{table}/{id}` - One row
 * - `DELETE /api/table/{table}/{id}` - Delete with cascade
 * - `GET    /api/tableSecondary/{table}/{id}` - Rows by fixed foreign key
 * - `GET    /api/tipoRecibo/{table}/{tipo}` - Rows by `tipo`
 *
 * ## Seats
 * - `POST /api/socios-carrozas/verificar-sitio` - Seat availability
 * - `GET  /api/debug/asignaciones` - Assignment listing
 *
 * With `REQUIRE_AUTH_FOR_MUTATIONS` set, POST/PUT/DELETE on `/api/table`
 * go through `require_auth`; reads stay open.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};

use crate::backend::middleware::require_auth;
use crate::backend::seats::{check_seat, list_assignments};
use crate::backend::server::state::AppState;
use crate::backend::tables::{
    create_record, delete_record, get_all, get_by_id, get_by_tipo, get_secondary, update_record,
};

/// Put a mutating method router behind the bearer check when configured
fn mutation(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    if state.config.require_auth_for_mutations {
        route.route_layer(from_fn_with_state(state.clone(), require_auth))
    } else {
        route
    }
}

/// Configure the generic table routes
pub fn configure_table_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route(
            "/api/table/{table}",
            get(get_all)
                .merge(mutation(post(create_record), state))
                .merge(mutation(put(update_record), state)),
        )
        .route(
            "/api/table/{table}/{id}",
            get(get_by_id).merge(mutation(delete(delete_record), state)),
        )
        .route("/api/tableSecondary/{table}/{id}", get(get_secondary))
        .route("/api/tipoRecibo/{table}/{tipo}", get(get_by_tipo))
}

/// Configure the seat routes
pub fn configure_seat_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/socios-carrozas/verificar-sitio", post(check_seat))
        .route("/api/debug/asignaciones", get(list_assignments))
}
