//! Response envelopes of the REST API.
//!
//! Every mutation answers with `{success, message, record}`; deletes add the
//! per-table cascade counts. Failures use [`ErrorBody`].

use crate::shared::error::FieldError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of a successful create/update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    pub record: serde_json::Value,
}

impl MutationResponse {
    pub fn ok(message: impl Into<String>, record: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            record,
        }
    }
}

/// Body of a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub record: serde_json::Value,
    /// Rows removed by the cascade, keyed by `parientes`, `carrozas`, `asignaciones`
    pub cascade_deleted: BTreeMap<String, u64>,
}

/// Body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
        }
    }
}

/// Request body of the seat availability check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatCheckRequest {
    pub carroza_id: serde_json::Value,
    pub sitio: String,
    pub tipo_usuario: String,
}

/// Result of the seat availability check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatAvailability {
    pub disponible: bool,
}
