//! Database connection pool and embedded migrations.

mod pool;

pub use pool::{AsyncDbPool, establish_async_connection_pool};

use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Runs all pending migrations against the given database.
///
/// The sync migration harness runs on a blocking thread wrapped around an
/// async connection.
pub async fn run_migrations(database_url: &str) -> anyhow::Result<()> {
    let url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
        for version in applied {
            tracing::info!(migration = %version, "Applied migration");
        }
        Ok::<_, anyhow::Error>(())
    })
    .await??;
    Ok(())
}
