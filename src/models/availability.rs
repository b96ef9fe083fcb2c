//! Barber working hours and availability slot models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Serde helper writing times as `HH:MM`
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A recurring weekly window during which a barber accepts bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkingHoursWindow {
    pub id: Uuid,
    pub barber_id: Uuid,
    /// Day of week (0=Sunday, 6=Saturday)
    pub day_of_week: i16,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "17:00")]
    pub end_time: NaiveTime,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Set availability for one day of the week
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetAvailability {
    /// Day of week (0=Sunday, 6=Saturday)
    #[validate(range(min = 0, max = 6, message = "day_of_week must be between 0 and 6"))]
    pub day_of_week: i16,
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Update an existing availability window
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAvailability {
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
    /// Keeps the current value when omitted
    pub is_active: Option<bool>,
}

/// Set several days at once
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkSetAvailability {
    #[validate(length(min = 1, message = "availability must not be empty"), nested)]
    pub availability: Vec<SetAvailability>,
}

/// Parsed values of a window, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkingHours {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
}

/// Parse an `HH:MM` pair and check that the end comes after the start
pub fn parse_time_range(start: &str, end: &str) -> AppResult<(NaiveTime, NaiveTime)> {
    let start_time = NaiveTime::parse_from_str(start, hhmm::FORMAT).map_err(|_| {
        AppError::Validation("invalid start_time format, expected HH:MM".to_string())
    })?;
    let end_time = NaiveTime::parse_from_str(end, hhmm::FORMAT)
        .map_err(|_| AppError::Validation("invalid end_time format, expected HH:MM".to_string()))?;

    if end_time <= start_time {
        return Err(AppError::Validation(
            "end_time must be after start_time".to_string(),
        ));
    }
    Ok((start_time, end_time))
}

impl SetAvailability {
    pub fn to_new_window(&self) -> AppResult<NewWorkingHours> {
        self.validate()?;
        let (start_time, end_time) = parse_time_range(&self.start_time, &self.end_time)?;
        Ok(NewWorkingHours {
            day_of_week: self.day_of_week,
            start_time,
            end_time,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

impl BulkSetAvailability {
    pub fn to_new_windows(&self) -> AppResult<Vec<NewWorkingHours>> {
        self.validate()?;
        self.availability
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry.to_new_window().map_err(|e| match e {
                    AppError::Validation(msg) => {
                        AppError::Validation(format!("availability[{}]: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect()
    }
}

/// Query parameters for the availability endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    /// Date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Service duration in minutes (default: 30, non-numeric values use the default)
    pub service_duration: Option<String>,
}

/// Available slots for one barber and day
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableSlotsResponse {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub service_duration: i64,
    /// Slot start times (HH:MM)
    pub available_slots: Vec<String>,
}

/// Weekly schedule of a barber
#[derive(Debug, Serialize, ToSchema)]
pub struct WeeklyAvailabilityResponse {
    pub barber_id: Uuid,
    pub availability: Vec<WorkingHoursWindow>,
}
