//! HTTP server lifecycle: startup, background jobs, graceful shutdown.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, Settings};
use crate::db::{establish_async_connection_pool, run_migrations};
use crate::jobs::{JobScheduler, RoleSweep};
use crate::state::AppState;

/// HTTP server manager.
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Starts the server and runs until a shutdown signal arrives.
    ///
    /// Startup order: configuration validation, optional migrations,
    /// connection pool, application state, role-sweep scheduler, router,
    /// listener.
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %Environment::from_env().as_str(),
            "Application starting"
        );

        self.settings.jwt.validate().map_err(|e| {
            tracing::error!(error = %e, "JWT configuration validation failed");
            anyhow::anyhow!("JWT configuration validation failed: {}", e)
        })?;

        if self.settings.database.auto_migrate {
            tracing::info!("Running pending migrations");
            run_migrations(&self.settings.database.url).await?;
        }

        tracing::info!(
            max_connections = %self.settings.database.max_connections,
            min_connections = %self.settings.database.min_connections,
            "Initializing database connection pool"
        );
        let pool = establish_async_connection_pool(&self.settings.database).await?;

        let state = AppState::new(pool, &self.settings);

        let scheduler = JobScheduler::new().await?;
        let sweep = RoleSweep::new(state.services.roles.clone(), state.broadcaster.clone());
        scheduler
            .add(sweep.into_job(Duration::from_secs(self.settings.roles.sweep_interval_secs))?)
            .await?;
        scheduler.start().await?;
        tracing::info!(
            interval_secs = %self.settings.roles.sweep_interval_secs,
            grant_ttl_secs = %self.settings.roles.grant_ttl_secs,
            "Role grant sweep scheduled"
        );

        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;
        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        scheduler.stop().await?;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Resolves when Ctrl+C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
