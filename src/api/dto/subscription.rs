//! Subscription-related DTOs for API requests and responses.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{ServiceName, Subscription};
use crate::services::ServicePopularity;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for adding a subscription to a user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSubscriptionRequest {
    pub service_name: ServiceName,
    pub start_date: NaiveDate,
    /// Absent means open-ended; when present must be today or later.
    #[validate(custom(function = "validate_end_date"))]
    pub end_date: Option<NaiveDate>,
}

fn validate_end_date(end_date: &NaiveDate) -> Result<(), ValidationError> {
    if *end_date < Utc::now().date_naive() {
        let mut error = ValidationError::new("end_date");
        error.message = Some("End date must be in the present or future".into());
        return Err(error);
    }
    Ok(())
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for a single subscription.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub service_name: ServiceName,
    pub service_display_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: Uuid,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            service_name: subscription.service_name,
            service_display_name: subscription.service_name.display_name().to_string(),
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
            user_id: subscription.user_id,
        }
    }
}

/// One entry of the top-N popularity ranking.
#[derive(Debug, Serialize, ToSchema)]
pub struct TopSubscriptionResponse {
    pub service_name: ServiceName,
    pub service_display_name: String,
    pub subscription_count: i64,
}

impl From<ServicePopularity> for TopSubscriptionResponse {
    fn from(entry: ServicePopularity) -> Self {
        Self {
            service_name: entry.service_name,
            service_display_name: entry.service_name.display_name().to_string(),
            subscription_count: entry.subscription_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn open_ended_subscription_is_valid() {
        let request = CreateSubscriptionRequest {
            service_name: ServiceName::YandexPlus,
            start_date: Utc::now().date_naive(),
            end_date: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn past_end_date_is_rejected() {
        let today = Utc::now().date_naive();
        let request = CreateSubscriptionRequest {
            service_name: ServiceName::NetflixStandard,
            start_date: today - Days::new(30),
            end_date: Some(today - Days::new(1)),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("end_date"));
    }

    #[test]
    fn today_end_date_is_accepted() {
        let today = Utc::now().date_naive();
        let request = CreateSubscriptionRequest {
            service_name: ServiceName::AppleMusic,
            start_date: today,
            end_date: Some(today),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn ranking_entry_carries_display_name() {
        let response = TopSubscriptionResponse::from(ServicePopularity {
            service_name: ServiceName::YoutubePremium,
            subscription_count: 3,
        });
        assert_eq!(response.service_display_name, "YouTube Premium");
        assert_eq!(response.subscription_count, 3);
    }
}
