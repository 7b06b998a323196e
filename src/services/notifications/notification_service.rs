//! Booking email rendering and fire-and-forget dispatch.

use std::sync::Arc;

use super::provider::{EmailMessage, NotificationProvider};
use super::smtp_provider::SmtpProvider;
use crate::config::MailConfig;

/// Renders booking emails and hands them to the configured provider.
///
/// Every public method returns immediately: delivery happens on a spawned
/// task and failures are logged, never propagated. With mail disabled the
/// service is a no-op.
#[derive(Clone)]
pub struct NotificationService {
    provider: Option<Arc<dyn NotificationProvider>>,
    studio_name: String,
}

impl NotificationService {
    pub fn new(config: MailConfig, studio_name: String) -> Self {
        let provider: Option<Arc<dyn NotificationProvider>> = if config.enabled {
            match SmtpProvider::new(&config) {
                Ok(provider) => Some(Arc::new(provider)),
                Err(e) => {
                    tracing::warn!(error = %e, "Mail disabled: SMTP provider failed to initialize");
                    None
                }
            }
        } else {
            None
        };

        Self {
            provider,
            studio_name,
        }
    }

    /// Confirmation to the reserving user after a proof upload.
    pub fn reservation_received(&self, to: &str, username: &str) {
        self.dispatch(EmailMessage {
            to: to.to_string(),
            subject: format!("Reservation received - {}", self.studio_name),
            html_body: render_reservation_received(&self.studio_name, username),
        });
    }

    /// Heads-up to the staff member owning the claimed slot.
    pub fn staff_new_reservation(&self, to: &str, staff_name: &str, offering_title: &str) {
        self.dispatch(EmailMessage {
            to: to.to_string(),
            subject: format!("New reservation - {}", self.studio_name),
            html_body: render_staff_new_reservation(&self.studio_name, staff_name, offering_title),
        });
    }

    /// Confirmation after staff finalizes a reservation.
    pub fn reservation_completed(&self, to: &str, username: &str) {
        self.dispatch(EmailMessage {
            to: to.to_string(),
            subject: format!("Reservation confirmed - {}", self.studio_name),
            html_body: render_reservation_completed(&self.studio_name, username),
        });
    }

    fn dispatch(&self, message: EmailMessage) {
        let Some(provider) = self.provider.clone() else {
            tracing::debug!(to = %message.to, "Mail disabled, skipping email");
            return;
        };

        tokio::spawn(async move {
            if let Err(e) = provider.send(&message).await {
                tracing::warn!(
                    error = %e,
                    provider = provider.name(),
                    to = %message.to,
                    "Failed to send booking email"
                );
            }
        });
    }
}

fn render_reservation_received(studio: &str, username: &str) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2>Reservation received - {studio}</h2>\
         <h3>Hello, {username}!</h3>\
         <p>We received your payment proof. We will confirm your reservation shortly.</p>\
         <p>Thank you for booking with {studio}.</p>\
         </div>"
    )
}

fn render_staff_new_reservation(studio: &str, staff_name: &str, offering_title: &str) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2>New reservation - {studio}</h2>\
         <p>Hello {staff_name},</p>\
         <p>A user has booked a slot of \"{offering_title}\" assigned to you.</p>\
         <p>Check the system for details.</p>\
         </div>"
    )
}

fn render_reservation_completed(studio: &str, username: &str) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2>Reservation confirmed - {studio}</h2>\
         <h3>Hello, {username}!</h3>\
         <p>Your reservation has been confirmed. See you soon!</p>\
         </div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_emails_address_the_recipient() {
        let body = render_reservation_received("Studio Sol", "ana");
        assert!(body.contains("Hello, ana!"));
        assert!(body.contains("Studio Sol"));

        let body = render_staff_new_reservation("Studio Sol", "marta", "Manicure");
        assert!(body.contains("marta"));
        assert!(body.contains("Manicure"));
    }

    #[test]
    fn disabled_mail_yields_noop_service() {
        let service = NotificationService::new(MailConfig::default(), "Studio".to_string());
        assert!(service.provider.is_none());
        // must not panic without a runtime
        service.reservation_received("x@example.com", "x");
    }
}
