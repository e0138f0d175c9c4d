//! Error response DTOs.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

/// Structured error body returned for every failed request.
///
/// Validation failures additionally carry a field-to-message map.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetails {
    /// When the error was produced (UTC)
    pub timestamp: NaiveDateTime,
    /// Human-readable description; opaque for internal failures
    pub message: String,
    /// Path of the originating request
    pub path: String,
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Field-to-message map, present for validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ErrorDetails {
    /// Creates an error body stamped with the current time.
    pub fn new(message: impl ToString, path: impl ToString, status: u16) -> Self {
        Self {
            timestamp: chrono::Utc::now().naive_utc(),
            message: message.to_string(),
            path: path.to_string(),
            status,
            errors: None,
        }
    }

    /// Attaches the per-field validation messages.
    pub fn with_field_errors(mut self, errors: BTreeMap<String, String>) -> Self {
        self.errors = Some(errors);
        self
    }
}
