//! User CRUD request handlers.
//!
//! Provides HTTP handlers for user management operations, including the
//! paginated users-with-subscription-names listing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    routing::get,
};
use uuid::Uuid;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    CreateUserRequest, PageResponse, PaginationParams, UpdateUserRequest, UserResponse,
    UserWithSubscriptionNamesResponse,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates user-related routes.
///
/// Routes:
/// - GET /                        - Paginated users with subscription names
/// - POST /                       - Create a new user
/// - GET /:id                     - Get user by ID
/// - PUT /:id                     - Update user by ID
/// - DELETE /:id                  - Delete user by ID (cascades)
/// - GET /:id/with-subscriptions  - Single user with subscription names
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/with-subscriptions", get(get_user_with_subscriptions))
}

/// POST /users - Create new user
///
/// Returns 201 Created with a Location header pointing at the new resource.
#[utoipa::path(
    post,
    path = "/users",
    tag = USER_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username or email already taken"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<UserResponse>), AppError> {
    let user = state
        .services
        .users
        .create_user(payload.into_new_user())
        .await?;
    let location = format!("/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(user)),
    ))
}

/// GET /users/:id - Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /users/:id - Partially update a user
///
/// Blank or omitted username/email keep the stored values; first/last name
/// are overwritten whenever supplied.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already taken"),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .services
        .users
        .update_user(id, payload.into_update_user())
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/:id - Delete user
///
/// Deletes the user and, through the store's cascade, all subscriptions.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users?page&size - Paginated users with subscription names
///
/// Page size counts users; each entry carries all of that user's
/// subscription names.
#[utoipa::path(
    get,
    path = "/users",
    tag = USER_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of users", body = PageResponse<UserWithSubscriptionNamesResponse>),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> Result<Json<PageResponse<UserWithSubscriptionNamesResponse>>, AppError> {
    let (page, total) = state
        .services
        .users
        .list_users_with_subscriptions(params.offset(), params.limit())
        .await?;

    let content = page
        .into_iter()
        .map(|(user, subscriptions)| {
            UserWithSubscriptionNamesResponse::from_parts(user, &subscriptions)
        })
        .collect();

    Ok(Json(PageResponse::new(content, &params, total as u64)))
}

/// GET /users/:id/with-subscriptions - Single user with subscription names
#[utoipa::path(
    get,
    path = "/users/{id}/with-subscriptions",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserWithSubscriptionNamesResponse),
        (status = 404, description = "User not found"),
    )
)]
pub async fn get_user_with_subscriptions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserWithSubscriptionNamesResponse>, AppError> {
    let (user, subscriptions) = state.services.users.get_user_with_subscriptions(id).await?;
    Ok(Json(UserWithSubscriptionNamesResponse::from_parts(
        user,
        &subscriptions,
    )))
}
