//! Barber service offerings

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult, models::BarberService,
    repository::barber_services::BarberServicesRepository,
};

#[derive(Clone)]
pub struct BarberServicesService {
    barber_services: Arc<dyn BarberServicesRepository>,
}

impl BarberServicesService {
    pub fn new(barber_services: Arc<dyn BarberServicesRepository>) -> Self {
        Self { barber_services }
    }

    pub async fn list(&self) -> AppResult<Vec<BarberService>> {
        self.barber_services.list().await
    }

    pub async fn list_for_barber(&self, barber_id: Uuid) -> AppResult<Vec<BarberService>> {
        self.barber_services.list_for_barber(barber_id).await
    }

    pub async fn create(&self, barber_id: Uuid, service_id: Uuid) -> AppResult<BarberService> {
        let offering = self.barber_services.create(barber_id, service_id).await?;
        tracing::info!(
            barber_service_id = %offering.id,
            %barber_id,
            %service_id,
            "Barber service created"
        );
        Ok(offering)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.barber_services.delete(id).await?;
        tracing::info!(barber_service_id = %id, "Barber service deleted");
        Ok(())
    }
}
