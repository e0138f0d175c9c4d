//! Database connection pool module.
//!
//! Provides async PostgreSQL connection pooling using diesel_async with bb8,
//! embedded migrations, and the one-time seed bootstrap.

mod pool;
mod seed;

pub use pool::{AsyncDbPool, MIGRATIONS, establish_async_connection_pool, run_pending_migrations};
pub use seed::seed_if_empty;
