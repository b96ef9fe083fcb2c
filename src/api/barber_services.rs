//! Barber service offering endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{barber_service::CreateBarberService, BarberService},
    AppState,
};

use super::AuthenticatedUser;

/// Every service offered by every barber
#[utoipa::path(
    get,
    path = "/haircuts/services",
    tag = "haircuts",
    responses(
        (status = 200, description = "Barber service offerings", body = Vec<BarberService>)
    )
)]
pub async fn list_barber_services(State(state): State<AppState>) -> AppResult<Json<Vec<BarberService>>> {
    let services = state.services.barber_services.list().await?;
    Ok(Json(services))
}

/// Services offered by one barber
#[utoipa::path(
    get,
    path = "/haircuts/barbers/{barber_id}/services",
    tag = "haircuts",
    params(("barber_id" = Uuid, Path, description = "Barber ID")),
    responses(
        (status = 200, description = "Barber service offerings", body = Vec<BarberService>)
    )
)]
pub async fn list_services_for_barber(
    State(state): State<AppState>,
    Path(barber_id): Path<Uuid>,
) -> AppResult<Json<Vec<BarberService>>> {
    let services = state.services.barber_services.list_for_barber(barber_id).await?;
    Ok(Json(services))
}

/// Let a barber offer a haircut service
#[utoipa::path(
    post,
    path = "/haircuts/services",
    tag = "haircuts",
    security(("bearer_auth" = [])),
    request_body = CreateBarberService,
    responses(
        (status = 201, description = "Barber service created", body = BarberService),
        (status = 404, description = "Barber or haircut service does not exist", body = crate::error::ErrorResponse),
        (status = 409, description = "Barber already offers this service", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_barber_service(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBarberService>,
) -> AppResult<(StatusCode, Json<BarberService>)> {
    claims.require_staff()?;
    let offering = state
        .services
        .barber_services
        .create(data.barber_id, data.service_id)
        .await?;
    Ok((StatusCode::CREATED, Json(offering)))
}

/// Stop offering a barber service
#[utoipa::path(
    delete,
    path = "/haircuts/services/{id}",
    tag = "haircuts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Barber service ID")),
    responses(
        (status = 204, description = "Barber service deleted"),
        (status = 404, description = "Barber service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_barber_service(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.barber_services.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
