use utoipa::OpenApi;

pub const USER_TAG: &str = "Users";
pub const SUBSCRIPTION_TAG: &str = "Subscriptions";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subtrack",
        description = "User and subscription tracking service",
    ),
    paths(
        crate::api::handlers::users::create_user,
        crate::api::handlers::users::get_user,
        crate::api::handlers::users::update_user,
        crate::api::handlers::users::delete_user,
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::get_user_with_subscriptions,
        crate::api::handlers::subscriptions::add_subscription,
        crate::api::handlers::subscriptions::list_subscriptions,
        crate::api::handlers::subscriptions::remove_subscription,
        crate::api::handlers::subscriptions::top_subscriptions,
    ),
    components(
        schemas(
            crate::api::dto::ErrorDetails,
            crate::models::ServiceName,
        )
    ),
    tags(
        (name = USER_TAG, description = "User management endpoints"),
        (name = SUBSCRIPTION_TAG, description = "Subscription management and reporting endpoints"),
    )
)]
pub struct ApiDoc;
