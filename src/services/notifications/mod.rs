//! Outbound booking notifications.
//!
//! Email delivery is strictly best-effort and off the critical path: a
//! failed or slow send is logged and never fails the booking operation
//! that triggered it.

mod notification_service;
mod provider;
mod smtp_provider;

pub use notification_service::NotificationService;
pub use provider::{EmailMessage, NotificationProvider};
pub use smtp_provider::SmtpProvider;
