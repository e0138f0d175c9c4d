//! Subscription service for business logic operations.
//!
//! Owns the per-user subscription invariants: the owning user must exist,
//! a (user, service) pair holds at most one subscription, and removal is
//! scoped by both the subscription id and the owner id.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewSubscription, ServiceName, Subscription};
use crate::repositories::{SubscriptionRepository, UserRepository};

/// One entry of the service popularity ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePopularity {
    pub service_name: ServiceName,
    pub subscription_count: i64,
}

/// Subscription service for handling subscription-related business logic.
///
/// Consults the user repository before mutating so that subscription
/// operations never bypass the user lifecycle.
#[derive(Clone)]
pub struct SubscriptionService {
    repo: SubscriptionRepository,
    user_repo: UserRepository,
}

impl SubscriptionService {
    /// Creates a new SubscriptionService with the given repositories.
    pub fn new(repo: SubscriptionRepository, user_repo: UserRepository) -> Self {
        Self { repo, user_repo }
    }

    /// Adds a subscription to a user.
    ///
    /// Fails `NotFound` when the user is absent and `Duplicate` when the
    /// user already holds a subscription for that service. Both pre-checks
    /// are fast paths: racing inserts are decided by the composite unique
    /// index, and an insert racing a user delete by the foreign key, each
    /// surfacing as the same error through the database converter.
    pub async fn add_subscription(
        &self,
        user_id: Uuid,
        service_name: ServiceName,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Subscription> {
        tracing::info!(user_id = %user_id, service = %service_name.as_token(), "Adding subscription");

        if !self.user_repo.exists_by_id(user_id).await? {
            return Err(AppError::not_found("user", "id", user_id));
        }
        if self
            .repo
            .exists_for_user_and_service(user_id, service_name)
            .await?
        {
            return Err(AppError::duplicate(
                "subscription",
                "service_name",
                service_name.as_token(),
            ));
        }

        let subscription = self
            .repo
            .create(NewSubscription::new(
                user_id,
                service_name,
                start_date,
                end_date,
            ))
            .await?;
        tracing::info!(
            user_id = %user_id,
            subscription_id = %subscription.id,
            "Subscription added"
        );
        Ok(subscription)
    }

    /// Lists all subscriptions owned by a user, or fails `NotFound`.
    pub async fn subscriptions_for_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        if !self.user_repo.exists_by_id(user_id).await? {
            return Err(AppError::not_found("user", "id", user_id));
        }
        self.repo.find_by_user(user_id).await
    }

    /// Removes a subscription, scoped by both the owner and the subscription id.
    ///
    /// "No such subscription" and "subscription belongs to someone else" are
    /// deliberately the same `NotFound`, so callers cannot probe other
    /// users' data.
    pub async fn remove_subscription(&self, user_id: Uuid, subscription_id: Uuid) -> AppResult<()> {
        tracing::info!(user_id = %user_id, subscription_id = %subscription_id, "Removing subscription");

        if !self.user_repo.exists_by_id(user_id).await? {
            return Err(AppError::not_found("user", "id", user_id));
        }
        let affected = self
            .repo
            .delete_by_id_and_user(subscription_id, user_id)
            .await?;
        if affected == 0 {
            return Err(AppError::not_found("subscription", "id", subscription_id));
        }
        tracing::info!(subscription_id = %subscription_id, "Subscription removed");
        Ok(())
    }

    /// Ranks services by subscription count, most popular first.
    ///
    /// Equal counts are ordered by the service token ascending; the ranking
    /// is stable across repeated calls against unchanged data.
    pub async fn top_subscriptions(&self, top: i64) -> AppResult<Vec<ServicePopularity>> {
        let counts = self.repo.count_by_service().await?;
        Ok(rank_services(counts, top.max(0) as usize))
    }
}

/// Orders grouped counts into the popularity ranking and keeps the top `n`.
///
/// Count descending, then service token ascending. The token is the only
/// tie-break, so two runs over the same counts always agree.
fn rank_services(mut counts: Vec<(ServiceName, i64)>, n: usize) -> Vec<ServicePopularity> {
    counts.sort_by(|(a_service, a_count), (b_service, b_count)| {
        b_count
            .cmp(a_count)
            .then_with(|| a_service.as_token().cmp(b_service.as_token()))
    });
    counts
        .into_iter()
        .take(n)
        .map(|(service_name, subscription_count)| ServicePopularity {
            service_name,
            subscription_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_orders_by_count_then_token() {
        let counts = vec![
            (ServiceName::YandexPlus, 1),
            (ServiceName::YoutubePremium, 3),
            (ServiceName::VkMusic, 1),
            (ServiceName::NetflixStandard, 2),
        ];

        let ranking = rank_services(counts, 3);

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].service_name, ServiceName::YoutubePremium);
        assert_eq!(ranking[0].subscription_count, 3);
        assert_eq!(ranking[1].service_name, ServiceName::NetflixStandard);
        assert_eq!(ranking[1].subscription_count, 2);
        // VK_MUSIC wins the 1-count tie over YANDEX_PLUS by ascending token
        assert_eq!(ranking[2].service_name, ServiceName::VkMusic);
        assert_eq!(ranking[2].subscription_count, 1);
    }

    #[test]
    fn ranking_is_stable_across_repeated_calls() {
        let counts = vec![
            (ServiceName::YandexPlus, 2),
            (ServiceName::AppleMusic, 2),
            (ServiceName::SpotifyPremium, 2),
        ];

        let first = rank_services(counts.clone(), 3);
        let second = rank_services(counts, 3);

        assert_eq!(first, second);
        assert_eq!(first[0].service_name, ServiceName::AppleMusic);
        assert_eq!(first[1].service_name, ServiceName::SpotifyPremium);
        assert_eq!(first[2].service_name, ServiceName::YandexPlus);
    }

    #[test]
    fn ranking_with_fewer_groups_than_requested() {
        let counts = vec![(ServiceName::NetflixStandard, 5)];
        let ranking = rank_services(counts, 3);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].subscription_count, 5);
    }
}
