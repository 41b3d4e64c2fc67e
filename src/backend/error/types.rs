/**
 * Backend Error Types
 *
 * This module defines the errors raised while serving requests. Every
 * handler returns `Result<_, BackendError>`; the `IntoResponse`
 * implementation in `conversion` turns an error into the JSON body the
 * clients expect.
 *
 * # Error Categories
 *
 * ## Internal errors (500)
 *
 * Database failures, unknown tables or columns, malformed bodies. The
 * detailed cause is logged, never returned: the client only sees a generic
 * Spanish message, optionally the one attached with [`BackendError::during`].
 *
 * ## Client errors
 *
 * Field validation (400 with an `errors` array) and handler errors carrying
 * an explicit status (401, 409, 429, ...).
 */

use crate::backend::db::DatabaseError;
use crate::backend::server::config::ConfigError;
use crate::shared::FieldError;
use axum::http::StatusCode;
use thiserror::Error;

/// Generic message for every internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";

/// Message returned with field validation errors
pub const VALIDATION_MESSAGE: &str = "Errores de validación";

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Failure reported by the database gateway
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// URL names a table that is not registered
    #[error("tabla desconocida: {0}")]
    UnknownTable(String),

    /// Body names a column the table does not have
    #[error("columna desconocida `{column}` en la tabla `{table}`")]
    UnknownColumn { table: String, column: String },

    /// Body value cannot be bound to a column
    #[error("valor no admitido para la columna `{column}`")]
    InvalidValue { column: String },

    /// Request body is not what the route expects
    #[error("cuerpo de la petición inválido: {0}")]
    InvalidBody(String),

    /// Field validation failed
    #[error("{} errores de validación", .0.len())]
    Validation(Vec<FieldError>),

    /// Handler error with an explicit status and public message
    #[error("{message}")]
    HandlerError { status: StatusCode, message: String },

    /// Internal failure annotated with the message the client should see
    #[error("{message}: {source}")]
    Operation {
        message: &'static str,
        #[source]
        source: Box<BackendError>,
    },

    /// Token could not be created
    #[error("error de token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Configuration could not be turned into a running state
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Password hashing failed
    #[error("error de contraseña: {0}")]
    Password(#[from] bcrypt::BcryptError),

    /// Mail could not be built or delivered
    #[error("error enviando correo: {0}")]
    Mail(String),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Attach the public message for an internal failure
    ///
    /// Client errors (validation, explicit handler statuses) pass through
    /// unchanged so their status survives.
    pub fn during(self, message: &'static str) -> Self {
        match self {
            Self::Validation(_) | Self::HandlerError { .. } | Self::Operation { .. } => self,
            other => Self::Operation {
                message,
                source: Box::new(other),
            },
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::HandlerError { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message safe to return to clients
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(_) => VALIDATION_MESSAGE.to_string(),
            Self::HandlerError { message, .. } => message.clone(),
            Self::Operation { message, .. } => message.to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Shorthand for `Result<T, BackendError>`
pub type BackendResult<T> = Result<T, BackendError>;

/// Annotate any backend failure with its public message
pub trait Context<T> {
    fn during(self, message: &'static str) -> BackendResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: Into<BackendError>,
{
    fn during(self, message: &'static str) -> BackendResult<T> {
        self.map_err(|e| e.into().during(message))
    }
}
