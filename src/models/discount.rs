//! Discount code models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// How a discount reduces the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::FixedAmount => "fixed_amount",
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed_amount" => Ok(DiscountType::FixedAmount),
            _ => Err(format!("Invalid discount type: {}", s)),
        }
    }
}

// Stored as VARCHAR
impl sqlx::Type<Postgres> for DiscountType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for DiscountType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for DiscountType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// A named, time-bounded promotional rule
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Discount {
    pub id: Uuid,
    /// Unique, case-sensitive code
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percentage off (percentage type)
    pub discount_percent: i32,
    /// Amount off (fixed_amount type)
    #[schema(value_type = Option<f64>)]
    pub discount_amount: Option<Decimal>,
    pub is_use_unlimited: bool,
    /// Max redemptions per customer
    pub use_per_client: Option<i32>,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub max_redemptions: Option<i32>,
    pub times_redeemed: i32,
    /// Membership plans the discount is limited to (empty = any plan)
    pub restricted_plan_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Discount {
    /// Per-customer cap, if one is enforced
    pub fn usage_cap(&self) -> Option<i32> {
        if self.is_use_unlimited {
            return None;
        }
        self.use_per_client.filter(|cap| *cap > 0)
    }

    /// Whether the plan passes the restriction list
    pub fn allows_plan(&self, plan_id: Uuid) -> bool {
        self.restricted_plan_ids.is_empty() || self.restricted_plan_ids.contains(&plan_id)
    }
}

/// Create or update discount request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DiscountRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[validate(range(min = 0, max = 100, message = "discount_percent must be between 0 and 100"))]
    #[serde(default)]
    pub discount_percent: i32,
    #[schema(value_type = Option<f64>)]
    pub discount_amount: Option<Decimal>,
    #[serde(default)]
    pub is_use_unlimited: bool,
    #[validate(range(min = 1, message = "use_per_client must be greater than 0"))]
    pub use_per_client: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "max_redemptions must be greater than 0"))]
    pub max_redemptions: Option<i32>,
    /// Membership plans the discount is limited to
    #[serde(default)]
    pub restricted_plan_ids: Vec<Uuid>,
}

fn default_true() -> bool {
    true
}

impl DiscountRequest {
    /// Field validation plus the cross-field rules of each discount type
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;

        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be blank".to_string()));
        }

        match self.discount_type {
            DiscountType::Percentage if !(1..=100).contains(&self.discount_percent) => {
                return Err(AppError::Validation(
                    "discount_percent must be between 1 and 100 for percentage type".to_string(),
                ));
            }
            DiscountType::FixedAmount
                if self.discount_amount.map_or(true, |a| a <= Decimal::ZERO) =>
            {
                return Err(AppError::Validation(
                    "discount_amount must be greater than 0 for fixed_amount type".to_string(),
                ));
            }
            _ => {}
        }

        if let Some(valid_to) = self.valid_to {
            if valid_to <= self.valid_from {
                return Err(AppError::Validation(
                    "valid_to must be after valid_from".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Apply a discount code for the authenticated customer
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ApplyDiscountRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub membership_plan_id: Option<Uuid>,
}

/// Usage of one discount by one customer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscountUsage {
    pub customer_id: Uuid,
    pub discount_id: Uuid,
    pub usage_count: i32,
}
