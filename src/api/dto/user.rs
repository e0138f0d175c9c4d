//! User-related DTOs for API requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewUser, Subscription, UpdateUser, User};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a new user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    #[schema(min_length = 3, max_length = 50)]
    pub username: String,
    #[validate(email(message = "Email should be valid"))]
    #[validate(length(max = 100, message = "Email must be at most 100 characters"))]
    #[schema(format = "email")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(format = "password", min_length = 6)]
    pub password: String,
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,
}

impl CreateUserRequest {
    /// Converts the request DTO into a NewUser model for database insertion.
    pub fn into_new_user(self) -> NewUser {
        NewUser::new(
            self.username,
            self.email,
            self.password,
            self.first_name,
            self.last_name,
        )
    }
}

/// Request body for updating a user.
///
/// Every field is optional. Username and email are applied only when
/// non-blank and different from the stored value; first/last name are
/// applied whenever present. `password` is accepted for wire compatibility
/// but never applied.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Email should be valid"))]
    #[validate(length(max = 100, message = "Email must be at most 100 characters"))]
    #[schema(format = "email")]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,
}

impl UpdateUserRequest {
    /// Converts the request DTO into a raw patch; the service merges it
    /// against the stored record. The password field is dropped here.
    pub fn into_update_user(self) -> UpdateUser {
        UpdateUser {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for user data (excludes sensitive fields like password).
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user annotated with the display names of their subscriptions.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserWithSubscriptionNamesResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub subscription_names: Vec<String>,
}

impl UserWithSubscriptionNamesResponse {
    /// Assembles the response from a user and their subscriptions.
    ///
    /// Only the display names are materialized; the caller never sees
    /// duplicated joined rows.
    pub fn from_parts(user: User, subscriptions: &[Subscription]) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
            subscription_names: subscriptions
                .iter()
                .map(|s| s.service_name.display_name().to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn create_request_enforces_shape() {
        let request = CreateUserRequest {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
            first_name: None,
            last_name: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn update_request_drops_password() {
        let request = UpdateUserRequest {
            username: Some("max.iv".to_string()),
            email: None,
            password: Some("newpassword".to_string()),
            first_name: Some("Max".to_string()),
            last_name: None,
        };
        let patch = request.into_update_user();
        assert_eq!(patch.username.as_deref(), Some("max.iv"));
        assert_eq!(patch.first_name.as_deref(), Some("Max"));
        // no password field exists on the changeset at all
    }

    #[test]
    fn omitted_optional_fields_pass_validation() {
        let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_ok());
        assert!(request.into_update_user().is_empty());
    }
}
