//! Haircut service catalog

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// A kind of haircut the shop sells
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HaircutService {
    pub id: Uuid,
    /// Unique name, used by customers when booking
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or replace a haircut service
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct HaircutServiceRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[validate(range(min = 1, max = 1440, message = "duration_minutes must be between 1 and 1440"))]
    pub duration_minutes: i32,
}

impl HaircutServiceRequest {
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be blank".to_string()));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::Validation("price must not be negative".to_string()));
        }
        Ok(())
    }
}
