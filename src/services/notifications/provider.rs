//! Notification provider abstraction.

use async_trait::async_trait;

use crate::error::AppResult;

/// A rendered email ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Trait for outbound notification transports.
///
/// Uses `async_trait` for dynamic dispatch; implementations must be
/// Send + Sync so sends can be spawned onto the runtime.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Delivers one message.
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
