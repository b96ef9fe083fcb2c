//! Haircut booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::event::{BookingEvent, CreateBookingEvent, EventQuery},
    AppState,
};

use super::AuthenticatedUser;

/// List booking events
#[utoipa::path(
    get,
    path = "/haircuts/events",
    tag = "events",
    security(("bearer_auth" = [])),
    params(EventQuery),
    responses(
        (status = 200, description = "Events ordered by start", body = Vec<BookingEvent>),
        (status = 400, description = "Neither a date range nor an id was given", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<Vec<BookingEvent>>> {
    let filter = query.to_filter()?;
    let events = state.services.events.list(&filter).await?;
    Ok(Json(events))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/haircuts/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = BookingEvent),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingEvent>> {
    let event = state.services.events.get_by_id(id).await?;
    Ok(Json(event))
}

/// Book a haircut for the authenticated customer
#[utoipa::path(
    post,
    path = "/haircuts/events",
    tag = "events",
    security(("bearer_auth" = [])),
    request_body = CreateBookingEvent,
    responses(
        (status = 201, description = "Event created", body = BookingEvent),
        (status = 400, description = "Invalid interval or unknown service", body = crate::error::ErrorResponse),
        (status = 404, description = "Barber, customer or service does not exist", body = crate::error::ErrorResponse),
        (status = 409, description = "Overlaps an existing booking", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBookingEvent>,
) -> AppResult<(StatusCode, Json<BookingEvent>)> {
    data.validate()?;
    let event = state
        .services
        .events
        .create_event(
            data.barber_id,
            claims.user_id,
            &data.service_name,
            data.begin_date_time,
            data.end_date_time,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/haircuts/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
