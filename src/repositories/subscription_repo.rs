//! Subscription repository for async database operations.
//!
//! Covers the per-user subscription lifecycle and the grouped popularity
//! query.

use diesel::dsl::{count_star, exists};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{NewSubscription, ServiceName, Subscription};

/// Subscription repository holding an async connection pool.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: AsyncDbPool,
}

impl SubscriptionRepository {
    /// Creates a new SubscriptionRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts a new subscription.
    ///
    /// The `(user_id, service_name)` unique index and the foreign key decide
    /// races at commit time: a duplicate insert surfaces as
    /// `AppError::Duplicate`, an insert racing a user delete as
    /// `AppError::NotFound`.
    pub async fn create(&self, new_subscription: NewSubscription) -> Result<Subscription, AppError> {
        use crate::schema::subscriptions::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(subscriptions)
            .values(&new_subscription)
            .returning(Subscription::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Lists all subscriptions owned by one user.
    pub async fn find_by_user(&self, owner_id: Uuid) -> Result<Vec<Subscription>, AppError> {
        use crate::schema::subscriptions::dsl::*;
        let mut conn = self.pool.get().await?;

        subscriptions
            .filter(user_id.eq(owner_id))
            .select(Subscription::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Loads subscriptions for a set of users in one query.
    ///
    /// The bounded-fan-out fetch of the two-phase listing: one query for the
    /// whole page, never one per user.
    pub async fn find_by_user_ids(&self, owner_ids: &[Uuid]) -> Result<Vec<Subscription>, AppError> {
        use crate::schema::subscriptions::dsl::*;
        let mut conn = self.pool.get().await?;

        subscriptions
            .filter(user_id.eq_any(owner_ids))
            .select(Subscription::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Checks whether a user already holds a subscription for a service.
    pub async fn exists_for_user_and_service(
        &self,
        owner_id: Uuid,
        service: ServiceName,
    ) -> Result<bool, AppError> {
        use crate::schema::subscriptions::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(exists(
            subscriptions
                .filter(user_id.eq(owner_id))
                .filter(service_name.eq(service)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(AppError::from)
    }

    /// Deletes a subscription scoped by both its id and its owner.
    ///
    /// # Returns
    /// The number of affected rows (0 or 1)
    pub async fn delete_by_id_and_user(
        &self,
        subscription_id: Uuid,
        owner_id: Uuid,
    ) -> Result<usize, AppError> {
        use crate::schema::subscriptions::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(
            subscriptions
                .filter(id.eq(subscription_id))
                .filter(user_id.eq(owner_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(AppError::from)
    }

    /// Counts subscriptions grouped by service.
    ///
    /// The group set is bounded by the closed service enumeration, so the
    /// result is always small; ordering and truncation happen in the service
    /// layer where the tie-break rule lives.
    pub async fn count_by_service(&self) -> Result<Vec<(ServiceName, i64)>, AppError> {
        use crate::schema::subscriptions::dsl::*;
        let mut conn = self.pool.get().await?;

        subscriptions
            .group_by(service_name)
            .select((service_name, count_star()))
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
