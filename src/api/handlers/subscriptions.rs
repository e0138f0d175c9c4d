//! Subscription request handlers.
//!
//! Subscription lifecycle endpoints are nested under their owning user;
//! the popularity ranking lives at the top level.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::api::doc::SUBSCRIPTION_TAG;
use crate::api::dto::{CreateSubscriptionRequest, SubscriptionResponse, TopSubscriptionResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// How many entries the popularity ranking returns.
const TOP_SUBSCRIPTION_COUNT: i64 = 3;

/// Creates subscription-related routes (absolute paths, merged at the root).
///
/// Routes:
/// - POST /users/:user_id/subscriptions              - Add a subscription
/// - GET /users/:user_id/subscriptions               - List a user's subscriptions
/// - DELETE /users/:user_id/subscriptions/:sub_id    - Remove a subscription
/// - GET /subscriptions/top                          - Top-3 popular services
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/subscriptions",
            get(list_subscriptions).post(add_subscription),
        )
        .route(
            "/users/{user_id}/subscriptions/{subscription_id}",
            delete(remove_subscription),
        )
        .route("/subscriptions/top", get(top_subscriptions))
}

/// POST /users/:user_id/subscriptions - Add a subscription
///
/// Returns 201 Created with a Location header pointing at the new resource.
#[utoipa::path(
    post,
    path = "/users/{user_id}/subscriptions",
    tag = SUBSCRIPTION_TAG,
    params(("user_id" = Uuid, Path, description = "Owning user id")),
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription added", body = SubscriptionResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already subscribed to this service"),
    )
)]
pub async fn add_subscription(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateSubscriptionRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<SubscriptionResponse>), AppError> {
    let subscription = state
        .services
        .subscriptions
        .add_subscription(
            user_id,
            payload.service_name,
            payload.start_date,
            payload.end_date,
        )
        .await?;
    let location = format!("/users/{}/subscriptions/{}", user_id, subscription.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SubscriptionResponse::from(subscription)),
    ))
}

/// GET /users/:user_id/subscriptions - List a user's subscriptions
#[utoipa::path(
    get,
    path = "/users/{user_id}/subscriptions",
    tag = SUBSCRIPTION_TAG,
    params(("user_id" = Uuid, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "The user's subscriptions", body = [SubscriptionResponse]),
        (status = 404, description = "User not found"),
    )
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let subscriptions = state
        .services
        .subscriptions
        .subscriptions_for_user(user_id)
        .await?;
    Ok(Json(
        subscriptions
            .into_iter()
            .map(SubscriptionResponse::from)
            .collect(),
    ))
}

/// DELETE /users/:user_id/subscriptions/:subscription_id - Remove a subscription
///
/// Both ids must match; a subscription owned by another user answers 404.
#[utoipa::path(
    delete,
    path = "/users/{user_id}/subscriptions/{subscription_id}",
    tag = SUBSCRIPTION_TAG,
    params(
        ("user_id" = Uuid, Path, description = "Owning user id"),
        ("subscription_id" = Uuid, Path, description = "Subscription id"),
    ),
    responses(
        (status = 204, description = "Subscription removed"),
        (status = 404, description = "User or subscription not found"),
    )
)]
pub async fn remove_subscription(
    State(state): State<AppState>,
    Path((user_id, subscription_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .subscriptions
        .remove_subscription(user_id, subscription_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /subscriptions/top - Top-3 popular services
///
/// Ordered by subscription count descending; equal counts are ordered by
/// the service token ascending, so repeated calls return identical results.
#[utoipa::path(
    get,
    path = "/subscriptions/top",
    tag = SUBSCRIPTION_TAG,
    responses(
        (status = 200, description = "Most popular services", body = [TopSubscriptionResponse]),
    )
)]
pub async fn top_subscriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<TopSubscriptionResponse>>, AppError> {
    let ranking = state
        .services
        .subscriptions
        .top_subscriptions(TOP_SUBSCRIPTION_COUNT)
        .await?;
    Ok(Json(
        ranking.into_iter().map(TopSubscriptionResponse::from).collect(),
    ))
}
