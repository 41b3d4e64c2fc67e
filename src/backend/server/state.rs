/**
 * Application State Management
 *
 * `AppState` is the one state container handed to the router. The `FromRef`
 * implementations let each handler extract only the part it needs:
 *
 * - `State<Database>` for the gateway over the shared pool
 * - `State<RealtimeHub>` to publish table changes
 * - `State<AuthState>` for tokens, mailer and rate limiters
 * - `State<Arc<ServerConfig>>` for the loaded configuration
 *
 * Every part is cheap to clone: the pool, the broadcast sender and the
 * limiters are reference-counted internally.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::AuthState;
use crate::backend::db::Database;
use crate::backend::realtime::RealtimeHub;
use crate::backend::server::config::ServerConfig;

/// Application state shared by every request handler
#[derive(Clone, Debug)]
pub struct AppState {
    /// Gateway over the PostgreSQL pool
    pub db: Database,

    /// Real-time fan-out hub
    pub realtime: RealtimeHub,

    /// Accounts, tokens and rate limiters
    pub auth: AuthState,

    /// Configuration loaded at startup
    pub config: Arc<ServerConfig>,
}

impl FromRef<AppState> for Database {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for RealtimeHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime.clone()
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
