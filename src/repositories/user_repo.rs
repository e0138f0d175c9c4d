//! User repository for async database operations.
//!
//! Provides CRUD operations for the users table using diesel_async, plus the
//! identifier-page queries backing the paginated listing.

use diesel::dsl::{exists, now};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{NewUser, UpdateUser, User};

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<UserRepository>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts a new user.
    ///
    /// The unique indexes on username and email are the authoritative guard;
    /// a commit-time violation surfaces as `AppError::Duplicate`.
    pub async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Finds a user by their ID.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Checks whether a user with this ID exists.
    pub async fn exists_by_id(&self, user_id: Uuid) -> Result<bool, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(exists(users.filter(id.eq(user_id))))
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Checks whether a username is taken, optionally excluding one user.
    ///
    /// The exclusion is what lets an update re-submit the current username
    /// without tripping the check.
    pub async fn username_taken(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let taken = match exclude {
            Some(user_id) => {
                diesel::select(exists(users.filter(username.eq(name)).filter(id.ne(user_id))))
                    .get_result(&mut conn)
                    .await?
            }
            None => {
                diesel::select(exists(users.filter(username.eq(name))))
                    .get_result(&mut conn)
                    .await?
            }
        };
        Ok(taken)
    }

    /// Checks whether an email is taken, optionally excluding one user.
    pub async fn email_taken(
        &self,
        address: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let taken = match exclude {
            Some(user_id) => {
                diesel::select(exists(users.filter(email.eq(address)).filter(id.ne(user_id))))
                    .get_result(&mut conn)
                    .await?
            }
            None => {
                diesel::select(exists(users.filter(email.eq(address))))
                    .get_result(&mut conn)
                    .await?
            }
        };
        Ok(taken)
    }

    /// Updates a user's data and refreshes the update timestamp.
    ///
    /// `None` fields in the changeset are ignored; `updated_at` is always
    /// written, so even an otherwise empty changeset produces a valid UPDATE.
    pub async fn update(&self, user_id: Uuid, update_data: UpdateUser) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)))
            .set((&update_data, updated_at.eq(now)))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Deletes a user; subscriptions go with it via `ON DELETE CASCADE`.
    ///
    /// # Returns
    /// The number of affected rows (0 or 1)
    pub async fn delete(&self, user_id: Uuid) -> Result<usize, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(users.filter(id.eq(user_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Loads one page of user identifiers ordered by username.
    ///
    /// First phase of the two-phase listing: pagination is applied to the
    /// distinct identifier set, never to joined rows.
    pub async fn find_ids_page(&self, offset: i64, limit: i64) -> Result<Vec<Uuid>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .order(username.asc())
            .select(id)
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Counts all users; the listing's total-element figure.
    pub async fn count_all(&self) -> Result<i64, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Loads full user records for a set of identifiers, ordered by username.
    ///
    /// Second phase of the two-phase listing: one bounded fetch for exactly
    /// the identifiers on the current page.
    pub async fn find_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq_any(user_ids))
            .order(username.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
