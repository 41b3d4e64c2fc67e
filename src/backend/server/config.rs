/**
 * Server Configuration
 *
 * This module loads the server configuration from environment variables
 * (after `.env` has been read by `main`), with defaults suited to local
 * development.
 *
 * # Database
 *
 * `DATABASE_URL` wins when set; otherwise the `DB_*` parts are combined.
 * The pool is created lazily: the server starts even while PostgreSQL is
 * unreachable and database-backed routes fail with a 500 until it is back.
 *
 * # Error Handling
 *
 * Unparsable values (a non-numeric port, a malformed URL) are a
 * `ConfigError` and abort startup. Missing values fall back to defaults.
 */

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Secret used when `JWT_SECRET` is unset; never acceptable in production
pub const DEV_JWT_SECRET: &str = "cabalgata-dev-secret-cambiar-en-produccion";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// `DATABASE_URL` is not a valid PostgreSQL URL
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(#[source] sqlx::Error),
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

/// SMTP settings for password-reset mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    /// When unset, reset links are only logged
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub from: String,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: DatabaseSettings,
    pub port: u16,
    /// Allowed CORS origin; also the base of password-reset links
    pub client_origin: String,
    pub jwt_secret: String,
    pub jwt_expires_hours: i64,
    /// When true, POST/PUT/DELETE on table routes require a bearer token
    pub require_auth_for_mutations: bool,
    pub mail: MailSettings,
}

impl ServerConfig {
    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if config.jwt_secret == DEV_JWT_SECRET {
            tracing::warn!("JWT_SECRET not set, using the development secret");
        }
        Ok(config)
    }

    /// Load the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseSettings {
            url: get("DATABASE_URL"),
            host: text("DB_HOST", "localhost"),
            port: parse(&get, "DB_PORT", 5432)?,
            user: text("DB_USER", "postgres"),
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            name: text("DB_NAME", "cabalgata"),
            max_connections: parse(&get, "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse(&get, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
        };

        let mail = MailSettings {
            smtp_host: get("SMTP_HOST"),
            smtp_port: parse(&get, "SMTP_PORT", 587)?,
            smtp_user: get("SMTP_USER"),
            smtp_password: get("SMTP_PASSWORD"),
            from: text("MAIL_FROM", "no-reply@cabalgata.local"),
        };

        Ok(Self {
            database,
            port: parse(&get, "PORT", 5000)?,
            client_origin: text("CLIENT_ORIGIN", "http://localhost:5173"),
            jwt_secret: text("JWT_SECRET", DEV_JWT_SECRET),
            jwt_expires_hours: parse(&get, "JWT_EXPIRES_HOURS", 24)?,
            require_auth_for_mutations: parse_flag(&get, "REQUIRE_AUTH_FOR_MUTATIONS")?,
            mail,
        })
    }
}

fn parse<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

fn parse_flag<G>(get: &G, key: &str) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|value| value.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(value) => match value.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        },
    }
}

impl DatabaseSettings {
    /// Connection options from the URL or the individual parts
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url).map_err(ConfigError::DatabaseUrl),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name)),
        }
    }
}

/// Create the connection pool without connecting
///
/// Connections are opened on first use; a missing database surfaces as a
/// query error on the request that needed it.
pub fn load_database(settings: &DatabaseSettings) -> Result<PgPool, ConfigError> {
    let options = settings.connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy_with(options);

    tracing::info!(
        "Database pool configured (max {} connections, acquire timeout {:?})",
        settings.max_connections,
        settings.acquire_timeout
    );
    Ok(pool)
}

/// Apply pending migrations from `migrations/`
///
/// A failure is logged and startup continues: the schema may already be in
/// place, or the database may come up later.
pub async fn run_migrations(pool: &PgPool) {
    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
        }
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }
}
