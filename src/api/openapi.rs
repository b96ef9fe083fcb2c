//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{availability, barber_services, discounts, events, haircut_services, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Barbershop API",
        version = "1.0.0",
        description = "Booking, availability and discount REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Availability
        availability::get_available_slots,
        availability::list_my_availability,
        availability::create_availability,
        availability::set_availability_bulk,
        availability::update_availability,
        availability::delete_availability,
        // Barber services
        barber_services::list_barber_services,
        barber_services::list_services_for_barber,
        barber_services::create_barber_service,
        barber_services::delete_barber_service,
        // Haircut service catalog
        haircut_services::list_haircut_services,
        haircut_services::create_haircut_service,
        haircut_services::update_haircut_service,
        haircut_services::delete_haircut_service,
        // Events
        events::list_events,
        events::get_event,
        events::create_event,
        events::delete_event,
        // Discounts
        discounts::apply_discount,
        discounts::list_discounts,
        discounts::get_discount,
        discounts::create_discount,
        discounts::update_discount,
        discounts::delete_discount,
        discounts::get_discount_usage,
    ),
    components(
        schemas(
            // Availability
            crate::models::availability::WorkingHoursWindow,
            crate::models::availability::SetAvailability,
            crate::models::availability::UpdateAvailability,
            crate::models::availability::BulkSetAvailability,
            crate::models::availability::AvailabilityQuery,
            crate::models::availability::AvailableSlotsResponse,
            crate::models::availability::WeeklyAvailabilityResponse,
            // Barber services
            crate::models::barber_service::BarberService,
            crate::models::barber_service::CreateBarberService,
            crate::models::haircut_service::HaircutService,
            crate::models::haircut_service::HaircutServiceRequest,
            // Events
            crate::models::event::BookingEvent,
            crate::models::event::CreateBookingEvent,
            crate::models::event::EventQuery,
            // Discounts
            crate::models::discount::Discount,
            crate::models::discount::DiscountType,
            crate::models::discount::DiscountRequest,
            crate::models::discount::ApplyDiscountRequest,
            crate::models::discount::DiscountUsage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "availability", description = "Barber working hours and free slots"),
        (name = "haircuts", description = "Haircut services offered by barbers"),
        (name = "events", description = "Haircut bookings"),
        (name = "discounts", description = "Discount codes")
    )
)]
pub struct ApiDoc;

/// JWT bearer scheme referenced by the `bearer_auth` security requirements
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
