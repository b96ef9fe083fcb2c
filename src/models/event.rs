//! Haircut booking event model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// A scheduled appointment between a barber and a customer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookingEvent {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub customer_id: Uuid,
    pub service_type_id: Uuid,
    pub begin_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    /// "First Last" of the barber
    pub barber_name: String,
    /// "First Last" of the customer
    pub customer_name: String,
    pub service_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingEvent {
    /// Half-open [begin, end) overlap test
    pub fn overlaps(&self, begin: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.begin_date_time < end && begin < self.end_date_time
    }
}

/// Create booking request (the customer is the authenticated user)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookingEvent {
    /// ISO-8601 start
    pub begin_date_time: DateTime<Utc>,
    /// ISO-8601 end
    pub end_date_time: DateTime<Utc>,
    pub barber_id: Uuid,
    /// Name of one of the barber's services (e.g. "Fade")
    #[validate(length(min = 1, message = "service_name is required"))]
    pub service_name: String,
}

/// Row values handed to the store once the service type is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookingEvent {
    pub begin_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub barber_id: Uuid,
    pub customer_id: Uuid,
    pub service_type_id: Uuid,
}

/// Query parameters for listing events
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    /// Events ending after this date (YYYY-MM-DD)
    pub after: Option<String>,
    /// Events starting before this date (YYYY-MM-DD)
    pub before: Option<String>,
    pub barber_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
}

/// Validated event filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub barber_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

fn parse_day(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::default()).and_utc())
        .map_err(|_| {
            AppError::BadRequest(format!("invalid '{}' date format, expected YYYY-MM-DD", field))
        })
}

impl EventQuery {
    /// Either a full date range or one of the ids must be given
    pub fn to_filter(&self) -> AppResult<EventFilter> {
        let after = self.after.as_deref().map(|s| parse_day(s, "after")).transpose()?;
        let before = self.before.as_deref().map(|s| parse_day(s, "before")).transpose()?;

        let has_range = after.is_some() && before.is_some();
        if !has_range && self.barber_id.is_none() && self.customer_id.is_none() {
            return Err(AppError::BadRequest(
                "at least one of (before and after) or one of (barber_id, customer_id) must be provided"
                    .to_string(),
            ));
        }

        Ok(EventFilter {
            barber_id: self.barber_id,
            customer_id: self.customer_id,
            after,
            before,
        })
    }
}
