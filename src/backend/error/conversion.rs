/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse`, so handlers can return them
 * directly. Internal failures are logged with their full cause chain; the
 * body only ever carries the public message:
 *
 * ```json
 * { "success": false, "message": "Error al crear el registro" }
 * ```
 *
 * Validation failures add the offending fields:
 *
 * ```json
 * { "success": false, "message": "Errores de validación",
 *   "errors": [{ "field": "email", "message": "..." }] }
 * ```
 */

use crate::backend::error::types::BackendError;
use crate::shared::api::ErrorBody;
use axum::{
    response::{IntoResponse, Response},
    Json,
};

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.public_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = match self {
            BackendError::Validation(errors) => ErrorBody::with_errors(message, errors),
            _ => ErrorBody::new(message),
        };

        (status, Json(body)).into_response()
    }
}
