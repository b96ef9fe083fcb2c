//! Barber availability endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::availability::{
        hhmm, AvailabilityQuery, AvailableSlotsResponse, BulkSetAvailability, SetAvailability,
        UpdateAvailability, WeeklyAvailabilityResponse, WorkingHoursWindow,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Parse the `date` query parameter; past dates are rejected
pub(crate) fn parse_query_date(raw: Option<&str>, today: NaiveDate) -> AppResult<NaiveDate> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("date parameter is required".to_string()))?;
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("invalid date format, expected YYYY-MM-DD".to_string()))?;
    if date < today {
        return Err(AppError::BadRequest("cannot get availability for past dates".to_string()));
    }
    Ok(date)
}

/// Minutes from the `service_duration` query parameter, or `default` when absent or not a number
pub(crate) fn parse_service_duration(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(default)
}

/// Free slots of a barber on a date
#[utoipa::path(
    get,
    path = "/haircuts/barbers/{barber_id}/availability",
    tag = "availability",
    params(
        ("barber_id" = Uuid, Path, description = "Barber ID"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Available slot start times", body = AvailableSlotsResponse),
        (status = 400, description = "Missing, invalid or past date", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_available_slots(
    State(state): State<AppState>,
    Path(barber_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailableSlotsResponse>> {
    let date = parse_query_date(query.date.as_deref(), Utc::now().date_naive())?;
    let service = &state.services.availability;
    let service_duration =
        parse_service_duration(query.service_duration.as_deref(), service.default_duration());

    let slots = service
        .get_available_slots(barber_id, date, Some(service_duration))
        .await?;

    Ok(Json(AvailableSlotsResponse {
        barber_id,
        date,
        service_duration,
        available_slots: slots
            .iter()
            .map(|t| t.format(hhmm::FORMAT).to_string())
            .collect(),
    }))
}

/// Weekly working hours of the authenticated barber
#[utoipa::path(
    get,
    path = "/haircuts/barbers/me/availability",
    tag = "availability",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Working hours", body = WeeklyAvailabilityResponse)
    )
)]
pub async fn list_my_availability(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<WeeklyAvailabilityResponse>> {
    claims.require_barber()?;
    let availability = state.services.availability.list_windows(claims.user_id).await?;
    Ok(Json(WeeklyAvailabilityResponse {
        barber_id: claims.user_id,
        availability,
    }))
}

/// Add a working-hours window
#[utoipa::path(
    post,
    path = "/haircuts/barbers/me/availability",
    tag = "availability",
    security(("bearer_auth" = [])),
    request_body = SetAvailability,
    responses(
        (status = 201, description = "Window created", body = WorkingHoursWindow),
        (status = 400, description = "Invalid window", body = crate::error::ErrorResponse),
        (status = 409, description = "Window already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_availability(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<SetAvailability>,
) -> AppResult<(StatusCode, Json<WorkingHoursWindow>)> {
    claims.require_barber()?;
    let window = state
        .services
        .availability
        .create_window(claims.user_id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(window)))
}

/// Insert or replace several windows at once
#[utoipa::path(
    post,
    path = "/haircuts/barbers/me/availability/bulk",
    tag = "availability",
    security(("bearer_auth" = [])),
    request_body = BulkSetAvailability,
    responses(
        (status = 200, description = "Windows saved", body = WeeklyAvailabilityResponse)
    )
)]
pub async fn set_availability_bulk(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<BulkSetAvailability>,
) -> AppResult<Json<WeeklyAvailabilityResponse>> {
    claims.require_barber()?;
    let availability = state
        .services
        .availability
        .set_windows(claims.user_id, &data)
        .await?;
    Ok(Json(WeeklyAvailabilityResponse {
        barber_id: claims.user_id,
        availability,
    }))
}

/// Update one of the authenticated barber's windows
#[utoipa::path(
    put,
    path = "/haircuts/barbers/me/availability/{id}",
    tag = "availability",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Window ID")),
    request_body = UpdateAvailability,
    responses(
        (status = 200, description = "Window updated", body = WorkingHoursWindow),
        (status = 403, description = "Window belongs to another barber", body = crate::error::ErrorResponse),
        (status = 404, description = "Window not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_availability(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateAvailability>,
) -> AppResult<Json<WorkingHoursWindow>> {
    claims.require_barber()?;
    let window = state
        .services
        .availability
        .update_window(claims.user_id, id, &data)
        .await?;
    Ok(Json(window))
}

/// Delete one of the authenticated barber's windows
#[utoipa::path(
    delete,
    path = "/haircuts/barbers/me/availability/{id}",
    tag = "availability",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Window ID")),
    responses(
        (status = 204, description = "Window deleted"),
        (status = 403, description = "Window belongs to another barber", body = crate::error::ErrorResponse),
        (status = 404, description = "Window not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_availability(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_barber()?;
    state
        .services
        .availability
        .delete_window(claims.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
