//! Async database connection pool.
//!
//! bb8 + diesel_async over PostgreSQL. The pool handles reconnection after
//! transient connection loss; callers just retry `get()`.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Async connection pool type alias.
///
/// bb8::Pool is internally reference-counted, so cloning is cheap and
/// structures holding the pool can derive Clone without extra Arc wrapping.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Builds the connection pool from database configuration.
pub async fn establish_async_connection_pool(
    config: &DatabaseConfig,
) -> Result<AsyncDbPool, AppError> {
    if config.url.is_empty() {
        return Err(AppError::Validation {
            field: "database.url".to_string(),
            reason: "Database URL is not configured".to_string(),
        });
    }

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await?;
    Ok(pool)
}
