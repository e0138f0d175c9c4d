//! Database models for users and subscriptions.

mod subscription;
mod user;

pub use subscription::{NewSubscription, ServiceName, Subscription};
pub use user::{NewUser, UpdateUser, User};
