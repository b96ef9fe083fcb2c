//! Haircut service catalog management

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::haircut_service::{HaircutService, HaircutServiceRequest},
    repository::haircut_services::HaircutServicesRepository,
};

#[derive(Clone)]
pub struct HaircutServicesService {
    haircut_services: Arc<dyn HaircutServicesRepository>,
}

impl HaircutServicesService {
    pub fn new(haircut_services: Arc<dyn HaircutServicesRepository>) -> Self {
        Self { haircut_services }
    }

    pub async fn list(&self) -> AppResult<Vec<HaircutService>> {
        self.haircut_services.list().await
    }

    pub async fn create(&self, request: &HaircutServiceRequest) -> AppResult<HaircutService> {
        request.check()?;
        let service = self.haircut_services.create(request).await?;
        tracing::info!(service_id = %service.id, name = %service.name, "Haircut service created");
        Ok(service)
    }

    pub async fn update(&self, id: Uuid, request: &HaircutServiceRequest) -> AppResult<HaircutService> {
        request.check()?;
        self.haircut_services.update(id, request).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.haircut_services.delete(id).await?;
        tracing::info!(service_id = %id, "Haircut service deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, repository::haircut_services::MockHaircutServicesRepository};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use tokio_test::{assert_err, assert_ok};

    fn request(name: &str, price: Decimal) -> HaircutServiceRequest {
        HaircutServiceRequest {
            name: name.to_string(),
            description: None,
            price,
            duration_minutes: 45,
        }
    }

    fn stored(id: Uuid, data: &HaircutServiceRequest) -> HaircutService {
        HaircutService {
            id,
            name: data.name.clone(),
            description: data.description.clone(),
            price: data.price,
            duration_minutes: data.duration_minutes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_storage() {
        let mut repo = MockHaircutServicesRepository::new();
        repo.expect_create().never();
        repo.expect_update().never();
        let service = HaircutServicesService::new(Arc::new(repo));

        let bad = request("Fade", Decimal::new(-500, 2));
        assert!(matches!(assert_err!(service.create(&bad).await), AppError::Validation(_)));
        assert!(matches!(
            assert_err!(service.update(Uuid::new_v4(), &bad).await),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_create_stores_request() {
        let mut repo = MockHaircutServicesRepository::new();
        repo.expect_create()
            .withf(|data| data.name == "Fade" && data.duration_minutes == 45)
            .times(1)
            .returning(|data| Ok(stored(Uuid::new_v4(), data)));

        let created = assert_ok!(
            HaircutServicesService::new(Arc::new(repo))
                .create(&request("Fade", Decimal::new(2500, 2)))
                .await
        );
        assert_eq!(created.price, Decimal::new(2500, 2));
    }

    #[tokio::test]
    async fn test_update_missing_service_is_not_found() {
        let mut repo = MockHaircutServicesRepository::new();
        repo.expect_update()
            .returning(|_, _| Err(AppError::NotFound("Service not found".to_string())));

        let result = HaircutServicesService::new(Arc::new(repo))
            .update(Uuid::new_v4(), &request("Fade", Decimal::new(2500, 2)))
            .await;
        assert!(matches!(assert_err!(result), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_booked_service_is_conflict() {
        let mut repo = MockHaircutServicesRepository::new();
        repo.expect_delete().times(1).returning(|_| {
            Err(AppError::Conflict(
                "Haircut service is referenced by existing bookings".to_string(),
            ))
        });

        let result = HaircutServicesService::new(Arc::new(repo)).delete(Uuid::new_v4()).await;
        assert_eq!(assert_err!(result).status(), axum::http::StatusCode::CONFLICT);
    }
}
