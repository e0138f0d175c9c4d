//! Service layer for business logic operations.
//!
//! Services own the consistency rules (identity uniqueness, per-user
//! subscription uniqueness, scoped removal) and compose the report queries;
//! repositories stay mechanical.

mod subscription_service;
mod user_service;

pub use subscription_service::{ServicePopularity, SubscriptionService};
pub use user_service::{UserService, UserWithSubscriptions};

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub subscriptions: SubscriptionService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            users: UserService::new(repos.users.clone(), repos.subscriptions.clone()),
            subscriptions: SubscriptionService::new(repos.subscriptions, repos.users),
        }
    }
}
