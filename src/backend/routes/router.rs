/**
 * Router Configuration
 *
 * Combines all route groups into one Axum router:
 * 1. Generic table routes
 * 2. Seat routes
 * 3. Authentication routes
 * 4. Real-time WebSocket (`/api/ws`, also `/ws`)
 * 5. JSON 404 fallback
 *
 * Layers, outermost first: request tracing, CORS for the configured client
 * origin, panic catcher (500 JSON body).
 */

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::INTERNAL_ERROR_MESSAGE;
use crate::backend::realtime::handle_realtime_socket;
use crate::backend::routes::auth_routes::configure_auth_routes;
use crate::backend::routes::table_routes::{configure_seat_routes, configure_table_routes};
use crate::backend::server::state::AppState;
use crate::shared::api::ErrorBody;

pub const NOT_FOUND_MESSAGE: &str = "Ruta no encontrada";

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(NOT_FOUND_MESSAGE)))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}

fn cors_layer(client_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match client_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin).allow_credentials(true),
        Err(_) => {
            tracing::warn!("CLIENT_ORIGIN {:?} is not a valid header value; cross-origin requests are refused", client_origin);
            cors
        }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new();
    let router = configure_table_routes(router, &app_state);
    let router = configure_seat_routes(router);
    let router = configure_auth_routes(router, &app_state);

    let router = router
        .route("/api/ws", get(handle_realtime_socket))
        .route("/ws", get(handle_realtime_socket));

    // Outermost first
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&app_state.config.client_origin))
        .layer(CatchPanicLayer::custom(panic_response));

    router.fallback(not_found).layer(layers).with_state(app_state)
}
