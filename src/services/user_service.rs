//! User service for business logic operations.
//!
//! Owns the user identity invariants (unique username/email, partial-update
//! merge rules) and composes the two-phase paginated listing.

use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Subscription, UpdateUser, User};
use crate::repositories::{SubscriptionRepository, UserRepository};

/// A user together with all of their subscriptions.
pub type UserWithSubscriptions = (User, Vec<Subscription>);

/// User service for handling user-related business logic.
///
/// Wraps `UserRepository` for lifecycle operations and reaches into
/// `SubscriptionRepository` for the batched subscription fetch of the
/// listing queries. Cloning is cheap, both repositories share `Arc`-backed
/// pools.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    subscription_repo: SubscriptionRepository,
}

impl UserService {
    /// Creates a new UserService with the given repositories.
    pub fn new(repo: UserRepository, subscription_repo: SubscriptionRepository) -> Self {
        Self {
            repo,
            subscription_repo,
        }
    }

    /// Creates a new user after checking username and email uniqueness.
    ///
    /// The checks are a fast path for a friendly error; the unique indexes
    /// decide racing creates at commit time and produce the same
    /// `Duplicate` error through the database converter.
    pub async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        tracing::info!(username = %new_user.username, "Creating user");

        if self.repo.username_taken(&new_user.username, None).await? {
            return Err(AppError::duplicate("user", "username", &new_user.username));
        }
        if self.repo.email_taken(&new_user.email, None).await? {
            return Err(AppError::duplicate("user", "email", &new_user.email));
        }

        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Gets a user by their ID, or fails with `NotFound`.
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    /// Applies a partial update to a user.
    ///
    /// Blank or omitted username/email leave the stored value untouched;
    /// first/last name are overwritten whenever supplied, including with an
    /// explicit empty value. Changed username/email are re-checked for
    /// uniqueness against all other users.
    pub async fn update_user(&self, id: Uuid, patch: UpdateUser) -> AppResult<User> {
        tracing::info!(user_id = %id, "Updating user");
        let existing = self.get_user(id).await?;

        let changeset = normalize_patch(&existing, patch);

        if let Some(username) = &changeset.username {
            if self.repo.username_taken(username, Some(id)).await? {
                return Err(AppError::duplicate("user", "username", username));
            }
        }
        if let Some(email) = &changeset.email {
            if self.repo.email_taken(email, Some(id)).await? {
                return Err(AppError::duplicate("user", "email", email));
            }
        }

        let user = self.repo.update(id, changeset).await?;
        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Deletes a user; the store cascades to their subscriptions.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        tracing::info!(user_id = %id, "Deleting user");
        let affected = self.repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::not_found("user", "id", id));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Gets one user together with all of their subscriptions.
    pub async fn get_user_with_subscriptions(&self, id: Uuid) -> AppResult<UserWithSubscriptions> {
        let user = self.get_user(id).await?;
        let subscriptions = self.subscription_repo.find_by_user(id).await?;
        Ok((user, subscriptions))
    }

    /// Lists one page of users with their subscriptions.
    ///
    /// Two phases: a page of user identifiers ordered by username (plus the
    /// total distinct-user count for page math), then one batched fetch of
    /// users and one of their subscriptions for exactly those identifiers.
    /// Page size is therefore measured in users; a user's subscriptions never
    /// split across pages. An identifier page beyond the data short-circuits
    /// to an empty result.
    pub async fn list_users_with_subscriptions(
        &self,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<UserWithSubscriptions>, i64)> {
        let total = self.repo.count_all().await?;
        let ids = self.repo.find_ids_page(offset, limit).await?;
        if ids.is_empty() {
            return Ok((Vec::new(), total));
        }

        let users = self.repo.find_by_ids(&ids).await?;
        let subscriptions = self.subscription_repo.find_by_user_ids(&ids).await?;
        let grouped = subscriptions.grouped_by(&users);

        Ok((users.into_iter().zip(grouped).collect(), total))
    }
}

/// Merges a raw patch against the stored record.
///
/// Username and email survive only when supplied non-blank and different
/// from the current value (equal values would needlessly trip the
/// exclusion-based uniqueness re-check). First/last name pass through
/// exactly as supplied.
fn normalize_patch(existing: &User, patch: UpdateUser) -> UpdateUser {
    let keep_if_changed = |supplied: Option<String>, current: &str| {
        supplied
            .filter(|value| !value.trim().is_empty())
            .filter(|value| value != current)
    };

    UpdateUser {
        username: keep_if_changed(patch.username, &existing.username),
        email: keep_if_changed(patch.email, &existing.email),
        first_name: patch.first_name,
        last_name: patch.last_name,
    }
}
