//! Discount endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::discount::{ApplyDiscountRequest, Discount, DiscountRequest, DiscountUsage},
    AppState,
};

use super::AuthenticatedUser;

/// Apply a discount code for the authenticated customer
#[utoipa::path(
    post,
    path = "/discounts/apply",
    tag = "discounts",
    security(("bearer_auth" = [])),
    request_body = ApplyDiscountRequest,
    responses(
        (status = 200, description = "Discount applied", body = Discount),
        (status = 403, description = "Usage limit reached or plan not eligible", body = crate::error::ErrorResponse),
        (status = 404, description = "No active discount with this name", body = crate::error::ErrorResponse)
    )
)]
pub async fn apply_discount(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<ApplyDiscountRequest>,
) -> AppResult<Json<Discount>> {
    data.validate()?;
    let discount = state
        .services
        .discounts
        .apply_discount(&data.name, claims.user_id, data.membership_plan_id)
        .await?;
    Ok(Json(discount))
}

/// List discounts
#[utoipa::path(
    get,
    path = "/discounts",
    tag = "discounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Discounts ordered by name", body = Vec<Discount>)
    )
)]
pub async fn list_discounts(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Discount>>> {
    claims.require_staff()?;
    let discounts = state.services.discounts.list().await?;
    Ok(Json(discounts))
}

/// Get discount by ID
#[utoipa::path(
    get,
    path = "/discounts/{id}",
    tag = "discounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Discount details", body = Discount),
        (status = 404, description = "Discount not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_discount(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Discount>> {
    claims.require_staff()?;
    let discount = state.services.discounts.get_by_id(id).await?;
    Ok(Json(discount))
}

/// Create a discount
#[utoipa::path(
    post,
    path = "/discounts",
    tag = "discounts",
    security(("bearer_auth" = [])),
    request_body = DiscountRequest,
    responses(
        (status = 201, description = "Discount created", body = Discount),
        (status = 400, description = "Invalid discount", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_discount(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<DiscountRequest>,
) -> AppResult<(StatusCode, Json<Discount>)> {
    claims.require_staff()?;
    let discount = state.services.discounts.create(&data, claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(discount)))
}

/// Replace a discount
#[utoipa::path(
    put,
    path = "/discounts/{id}",
    tag = "discounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Discount ID")),
    request_body = DiscountRequest,
    responses(
        (status = 200, description = "Discount updated", body = Discount),
        (status = 404, description = "Discount not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_discount(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<DiscountRequest>,
) -> AppResult<Json<Discount>> {
    claims.require_staff()?;
    let discount = state.services.discounts.update(id, &data, claims.user_id).await?;
    Ok(Json(discount))
}

/// Delete a discount
#[utoipa::path(
    delete,
    path = "/discounts/{id}",
    tag = "discounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 204, description = "Discount deleted"),
        (status = 404, description = "Discount not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_discount(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.discounts.delete(id, claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// How many times a customer has used a discount
#[utoipa::path(
    get,
    path = "/discounts/{id}/usage/{customer_id}",
    tag = "discounts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Discount ID"),
        ("customer_id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Usage count", body = DiscountUsage),
        (status = 404, description = "Discount not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_discount_usage(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, customer_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<DiscountUsage>> {
    claims.require_staff()?;
    let usage = state.services.discounts.usage(customer_id, id).await?;
    Ok(Json(usage))
}
