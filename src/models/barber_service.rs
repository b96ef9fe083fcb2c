//! Services offered by barbers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One haircut service offered by one barber
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BarberService {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub service_type_id: Uuid,
    pub haircut_name: String,
    pub barber_name: String,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Link a barber to a haircut service
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBarberService {
    pub barber_id: Uuid,
    pub service_id: Uuid,
}
