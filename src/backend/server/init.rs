/**
 * Server Initialization
 *
 * 1. Create the lazy PostgreSQL pool from the configuration
 * 2. Create the real-time hub and the auth state
 * 3. Run pending migrations (failures are logged, startup continues)
 * 4. Build the router
 *
 * `build_state` stops before touching the database so router tests can run
 * without PostgreSQL.
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::auth::AuthState;
use crate::backend::db::Database;
use crate::backend::error::BackendResult;
use crate::backend::realtime::RealtimeHub;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, run_migrations, ServerConfig};
use crate::backend::server::state::AppState;

/// Assemble the application state without connecting to the database
pub fn build_state(config: ServerConfig) -> BackendResult<AppState> {
    let pool = load_database(&config.database)?;
    let auth = AuthState::new(&config)?;

    if config.require_auth_for_mutations {
        tracing::info!("Table mutations require a bearer token");
    }

    Ok(AppState {
        db: Database::new(pool),
        realtime: RealtimeHub::default(),
        auth,
        config: Arc::new(config),
    })
}

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> BackendResult<Router<()>> {
    tracing::info!("Initializing cabalgata backend server");

    let state = build_state(config)?;
    run_migrations(state.db.pool()).await;

    let app = create_router(state);
    tracing::info!("Router configured");
    Ok(app)
}
