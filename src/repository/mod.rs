//! Repository layer for database operations

pub mod audit;
pub mod availability;
pub mod barber_services;
pub mod constraints;
pub mod discounts;
pub mod events;
pub mod haircut_services;
pub mod memberships;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub availability: Arc<dyn availability::AvailabilityRepository>,
    pub events: Arc<dyn events::EventsRepository>,
    pub barber_services: Arc<dyn barber_services::BarberServicesRepository>,
    pub haircut_services: Arc<dyn haircut_services::HaircutServicesRepository>,
    pub discounts: Arc<dyn discounts::DiscountsRepository>,
    pub memberships: Arc<dyn memberships::MembershipsRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            availability: Arc::new(availability::AvailabilityStore::new(pool.clone())),
            events: Arc::new(events::EventsStore::new(pool.clone())),
            barber_services: Arc::new(barber_services::BarberServicesStore::new(pool.clone())),
            haircut_services: Arc::new(haircut_services::HaircutServicesStore::new(pool.clone())),
            discounts: Arc::new(discounts::DiscountsStore::new(pool.clone())),
            memberships: Arc::new(memberships::MembershipsStore::new(pool.clone())),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness check
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
