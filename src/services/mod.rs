//! Business logic services

pub mod availability;
pub mod barber_services;
pub mod discounts;
pub mod events;
pub mod haircut_services;

use crate::{config::BookingConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub events: events::EventsService,
    pub barber_services: barber_services::BarberServicesService,
    pub haircut_services: haircut_services::HaircutServicesService,
    pub discounts: discounts::DiscountsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, booking: BookingConfig) -> Self {
        Self {
            availability: availability::AvailabilityService::new(
                repository.availability.clone(),
                repository.events.clone(),
                booking,
            ),
            events: events::EventsService::new(
                repository.events.clone(),
                repository.barber_services.clone(),
            ),
            barber_services: barber_services::BarberServicesService::new(
                repository.barber_services.clone(),
            ),
            haircut_services: haircut_services::HaircutServicesService::new(
                repository.haircut_services.clone(),
            ),
            discounts: discounts::DiscountsService::new(
                repository.discounts.clone(),
                repository.memberships.clone(),
            ),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ready(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
