//! Validating extractors.
//!
//! Wrap axum's `Json` and `Query` extractors so that malformed shapes are
//! rejected as `BadRequest` and `validator` failures as structured
//! `Validation` errors before a handler ever sees the payload.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// JSON body that has passed `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string that has passed `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request as HttpRequest, header};
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(min = 3, message = "Username must be between 3 and 50 characters"))]
        username: String,
        #[validate(email(message = "Email should be valid"))]
        email: String,
    }

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let request = json_request(r#"{"username":"max.iv","email":"max.iv@example.com"}"#);
        let result = ValidatedJson::<TestBody>::from_request(request, &()).await;
        let ValidatedJson(body) = result.unwrap();
        assert_eq!(body.username, "max.iv");
    }

    #[tokio::test]
    async fn invalid_field_becomes_validation_error() {
        let request = json_request(r#"{"username":"ab","email":"max.iv@example.com"}"#);
        let result = ValidatedJson::<TestBody>::from_request(request, &()).await;
        match result {
            Err(AppError::Validation { errors }) => {
                assert!(errors.contains_key("username"));
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_json_becomes_bad_request() {
        let request = json_request("{not json");
        let result = ValidatedJson::<TestBody>::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn unknown_enum_token_becomes_bad_request() {
        #[derive(Debug, Deserialize, Validate)]
        struct EnumBody {
            service_name: crate::models::ServiceName,
        }

        let request = json_request(r#"{"service_name":"DISNEY_PLUS"}"#);
        let result = ValidatedJson::<EnumBody>::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }
}
