//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `user` - User-related request/response DTOs
//! - `subscription` - Subscription-related request/response DTOs
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination-related DTOs

mod error;
mod pagination;
mod subscription;
mod user;

pub use error::ErrorDetails;
pub use pagination::{PageResponse, PaginationParams};
pub use subscription::{
    CreateSubscriptionRequest, SubscriptionResponse, TopSubscriptionResponse,
};
pub use user::{
    CreateUserRequest, UpdateUserRequest, UserResponse, UserWithSubscriptionNamesResponse,
};
