use std::collections::BTreeMap;

use thiserror::Error;

use crate::error::DatabaseErrorConverter;

/// Application-wide error type that represents all possible errors in the system.
///
/// The three domain kinds (`NotFound`, `Duplicate`, `Validation`) are terminal
/// for the current request and map directly onto 404/409/400 at the boundary;
/// the remaining variants cover infrastructure failures and are surfaced
/// opaquely.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("{entity} not found with {field}: {value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("{entity} with {field} '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error carrying a field-to-message map
    #[error("Validation failed")]
    Validation { errors: BTreeMap<String, String> },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn not_found(entity: &str, field: &str, value: impl ToString) -> Self {
        AppError::NotFound {
            entity: entity.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn duplicate(entity: &str, field: &str, value: impl ToString) -> Self {
        AppError::Duplicate {
            entity: entity.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Single-field validation failure.
    pub fn validation(field: &str, reason: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), reason.to_string());
        AppError::Validation { errors }
    }

    pub fn bad_request(message: impl ToString) -> Self {
        AppError::BadRequest {
            message: message.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for AppError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::new(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let map = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let message = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("invalid value for {}", field))
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                (field.to_string(), message)
            })
            .collect();
        AppError::Validation { errors: map }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "Username must be between 3 and 50 characters"))]
        username: String,
    }

    #[test]
    fn validation_errors_collapse_to_field_map() {
        let probe = Probe {
            username: "ab".to_string(),
        };
        let error: AppError = probe.validate().unwrap_err().into();
        match error {
            AppError::Validation { errors } => {
                assert_eq!(
                    errors.get("username").map(String::as_str),
                    Some("Username must be between 3 and 50 characters")
                );
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn helper_constructors_fill_context() {
        let error = AppError::not_found("user", "id", "42");
        assert_eq!(error.to_string(), "user not found with id: 42");

        let error = AppError::duplicate("user", "email", "a@b.c");
        assert_eq!(error.to_string(), "user with email 'a@b.c' already exists");
    }
}
