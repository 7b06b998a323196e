use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const CATALOG_TAG: &str = "Catalog";
pub const BOOKING_TAG: &str = "Booking";
pub const USER_TAG: &str = "Users";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reserva",
        description = "Booking and catalog API: offerings, availability slots, reservations, and the close-out report",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::OfferingResponse,
            crate::api::dto::AvailabilityResponse,
            crate::api::dto::ReservationResponse,
            crate::api::dto::SummaryResponse,
            crate::models::OfferingKind,
            crate::models::SlotStatus,
            crate::models::ReservationStatus,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Authentication endpoints"),
        (name = CATALOG_TAG, description = "Offerings and add-on options"),
        (name = BOOKING_TAG, description = "Availabilities, reservations, and the close-out report"),
        (name = USER_TAG, description = "User administration and role grants"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer Token Authentication"))
                        .build(),
                ),
            )
        }
    }
}
