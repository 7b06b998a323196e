use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler as TokioCronScheduler};

use crate::error::{AppError, AppResult};

/// Wrapper around tokio-cron-scheduler for the service's periodic jobs.
pub struct JobScheduler {
    scheduler: Arc<Mutex<TokioCronScheduler>>,
}

impl JobScheduler {
    pub async fn new() -> AppResult<Self> {
        let scheduler = TokioCronScheduler::new()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        Ok(Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
        })
    }

    /// Registers a job with the underlying scheduler.
    pub async fn add(&self, job: Job) -> AppResult<()> {
        self.scheduler
            .lock()
            .await
            .add(job)
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;
        Ok(())
    }

    /// Starts running registered jobs.
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .lock()
            .await
            .start()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;
        Ok(())
    }

    /// Stops the scheduler gracefully.
    pub async fn stop(&self) -> AppResult<()> {
        self.scheduler
            .lock()
            .await
            .shutdown()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;
        Ok(())
    }
}
