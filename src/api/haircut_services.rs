//! Haircut service catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::haircut_service::{HaircutService, HaircutServiceRequest},
    AppState,
};

use super::AuthenticatedUser;

/// Haircut services sold by the shop
#[utoipa::path(
    get,
    path = "/haircuts/service-types",
    tag = "haircuts",
    responses(
        (status = 200, description = "Haircut services ordered by name", body = Vec<HaircutService>)
    )
)]
pub async fn list_haircut_services(State(state): State<AppState>) -> AppResult<Json<Vec<HaircutService>>> {
    let services = state.services.haircut_services.list().await?;
    Ok(Json(services))
}

/// Add a haircut service
#[utoipa::path(
    post,
    path = "/haircuts/service-types",
    tag = "haircuts",
    security(("bearer_auth" = [])),
    request_body = HaircutServiceRequest,
    responses(
        (status = 201, description = "Haircut service created", body = HaircutService),
        (status = 400, description = "Invalid service", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_haircut_service(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<HaircutServiceRequest>,
) -> AppResult<(StatusCode, Json<HaircutService>)> {
    claims.require_staff()?;
    let service = state.services.haircut_services.create(&data).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Replace a haircut service
#[utoipa::path(
    put,
    path = "/haircuts/service-types/{id}",
    tag = "haircuts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Haircut service ID")),
    request_body = HaircutServiceRequest,
    responses(
        (status = 200, description = "Haircut service updated", body = HaircutService),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_haircut_service(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<HaircutServiceRequest>,
) -> AppResult<Json<HaircutService>> {
    claims.require_staff()?;
    let service = state.services.haircut_services.update(id, &data).await?;
    Ok(Json(service))
}

/// Delete a haircut service no booking refers to
#[utoipa::path(
    delete,
    path = "/haircuts/service-types/{id}",
    tag = "haircuts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Haircut service ID")),
    responses(
        (status = 204, description = "Haircut service deleted"),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Service has bookings", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_haircut_service(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.haircut_services.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
