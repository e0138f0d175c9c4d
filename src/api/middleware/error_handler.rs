//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError::into_response` maps each variant to its status code and stashes
//! the sanitized message (plus validation field errors) in the response
//! extensions as [`ErrorMeta`]. The router-level
//! [`error_details_middleware`] then builds the final JSON body, which needs
//! the request path that `IntoResponse` cannot see.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorDetails;
use crate::error::AppError;

/// Sanitized error information carried from `IntoResponse` to the body-shaping
/// middleware via response extensions.
#[derive(Debug, Clone)]
pub struct ErrorMeta {
    pub message: String,
    pub field_errors: Option<BTreeMap<String, String>>,
}

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate → 409 CONFLICT
    /// - Validation → 400 BAD_REQUEST
    /// - BadRequest → 400 BAD_REQUEST
    /// - Database → 500 INTERNAL_SERVER_ERROR
    /// - ConnectionPool → 503 SERVICE_UNAVAILABLE
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    ///
    /// Domain errors keep their message; infrastructure failures are logged
    /// with full detail and surfaced opaquely.
    fn into_response(self) -> Response {
        let (status, meta) = match &self {
            AppError::NotFound { .. } => {
                tracing::warn!(error = %self, "Resource not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorMeta {
                        message: self.to_string(),
                        field_errors: None,
                    },
                )
            }
            AppError::Duplicate { .. } => {
                tracing::warn!(error = %self, "Duplicate resource");
                (
                    StatusCode::CONFLICT,
                    ErrorMeta {
                        message: self.to_string(),
                        field_errors: None,
                    },
                )
            }
            AppError::Validation { errors } => {
                tracing::warn!(?errors, "Validation error");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorMeta {
                        message: "Validation Failed".to_string(),
                        field_errors: Some(errors.clone()),
                    },
                )
            }
            AppError::BadRequest { message } => {
                tracing::warn!(message = %message, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorMeta {
                        message: message.clone(),
                        field_errors: None,
                    },
                )
            }
            AppError::ConnectionPool { source } => {
                tracing::error!(error = ?source, "Connection pool error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorMeta {
                        message: "Service temporarily unavailable. Please try again later."
                            .to_string(),
                        field_errors: None,
                    },
                )
            }
            AppError::Database { operation, source } => {
                tracing::error!(operation = %operation, error = ?source, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorMeta {
                        message: "An internal server error occurred. Please try again later."
                            .to_string(),
                        field_errors: None,
                    },
                )
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorMeta {
                        message: "An internal server error occurred. Please try again later."
                            .to_string(),
                        field_errors: None,
                    },
                )
            }
        };

        let mut response = status.into_response();
        response.extensions_mut().insert(meta);
        response
    }
}

/// Middleware that turns an [`ErrorMeta`]-carrying response into the final
/// structured error body, stamped with the originating request path.
pub async fn error_details_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(meta) = response.extensions().get::<ErrorMeta>().cloned() else {
        return response;
    };

    let status = response.status();
    let mut details = ErrorDetails::new(&meta.message, &path, status.as_u16());
    if let Some(errors) = meta.field_errors {
        details = details.with_field_errors(errors);
    }
    (status, Json(details)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use tower::ServiceExt;

    async fn failing_not_found() -> Result<(), AppError> {
        Err(AppError::not_found("user", "id", "missing"))
    }

    async fn failing_duplicate() -> Result<(), AppError> {
        Err(AppError::duplicate("user", "email", "a@b.c"))
    }

    async fn failing_validation() -> Result<(), AppError> {
        Err(AppError::validation("username", "Username cannot be blank"))
    }

    async fn failing_internal() -> Result<(), AppError> {
        Err(AppError::Internal {
            source: anyhow::anyhow!("secret pool detail"),
        })
    }

    fn test_router() -> Router {
        Router::new()
            .route("/not-found", get(failing_not_found))
            .route("/duplicate", get(failing_duplicate))
            .route("/invalid", get(failing_validation))
            .route("/boom", get(failing_internal))
            .layer(middleware::from_fn(error_details_middleware))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_body_carries_path_and_status() {
        let response = test_router()
            .oneshot(
                HttpRequest::get("/not-found")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["path"], "/not-found");
        assert_eq!(body["message"], "user not found with id: missing");
        assert!(body["timestamp"].is_string());
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn duplicate_maps_to_conflict() {
        let response = test_router()
            .oneshot(HttpRequest::get("/duplicate").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["status"], 409);
        assert_eq!(body["message"], "user with email 'a@b.c' already exists");
    }

    #[tokio::test]
    async fn validation_body_carries_field_map() {
        let response = test_router()
            .oneshot(HttpRequest::get("/invalid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation Failed");
        assert_eq!(body["errors"]["username"], "Username cannot be blank");
    }

    #[tokio::test]
    async fn internal_error_is_opaque() {
        let response = test_router()
            .oneshot(HttpRequest::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        let message = body["message"].as_str().unwrap();
        assert!(!message.contains("secret pool detail"));
    }
}
