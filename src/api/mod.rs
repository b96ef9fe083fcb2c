//! API handlers for the barbershop REST endpoints

pub mod availability;
pub mod barber_services;
pub mod discounts;
pub mod events;
pub mod haircut_services;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Availability
        .route(
            "/haircuts/barbers/me/availability",
            get(availability::list_my_availability).post(availability::create_availability),
        )
        .route(
            "/haircuts/barbers/me/availability/bulk",
            post(availability::set_availability_bulk),
        )
        .route(
            "/haircuts/barbers/me/availability/:id",
            put(availability::update_availability).delete(availability::delete_availability),
        )
        .route(
            "/haircuts/barbers/:barber_id/availability",
            get(availability::get_available_slots),
        )
        // Barber services
        .route(
            "/haircuts/services",
            get(barber_services::list_barber_services).post(barber_services::create_barber_service),
        )
        .route("/haircuts/services/:id", delete(barber_services::delete_barber_service))
        .route(
            "/haircuts/barbers/:barber_id/services",
            get(barber_services::list_services_for_barber),
        )
        // Haircut service catalog
        .route(
            "/haircuts/service-types",
            get(haircut_services::list_haircut_services).post(haircut_services::create_haircut_service),
        )
        .route(
            "/haircuts/service-types/:id",
            put(haircut_services::update_haircut_service).delete(haircut_services::delete_haircut_service),
        )
        // Events
        .route("/haircuts/events", get(events::list_events).post(events::create_event))
        .route("/haircuts/events/:id", get(events::get_event).delete(events::delete_event))
        // Discounts
        .route("/discounts/apply", post(discounts::apply_discount))
        .route("/discounts", get(discounts::list_discounts).post(discounts::create_discount))
        .route(
            "/discounts/:id",
            get(discounts::get_discount)
                .put(discounts::update_discount)
                .delete(discounts::delete_discount),
        )
        .route("/discounts/:id/usage/:customer_id", get(discounts::get_discount_usage))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
