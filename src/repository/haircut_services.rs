//! Haircut service catalog repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::constraints::{self, HAIRCUT_SERVICE_CONSTRAINTS};
use crate::{
    error::{AppError, AppResult},
    models::haircut_service::{HaircutService, HaircutServiceRequest},
};

const RETURNING_COLUMNS: &str =
    "id, name, description, price, duration_minutes, created_at, updated_at";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait HaircutServicesRepository: Send + Sync {
    /// All services, ordered by name
    async fn list(&self) -> AppResult<Vec<HaircutService>>;

    async fn create(&self, data: &HaircutServiceRequest) -> AppResult<HaircutService>;

    async fn update(&self, id: Uuid, data: &HaircutServiceRequest) -> AppResult<HaircutService>;

    /// Fails while bookings still reference the service
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct HaircutServicesStore {
    pool: Pool<Postgres>,
}

impl HaircutServicesStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HaircutServicesRepository for HaircutServicesStore {
    async fn list(&self) -> AppResult<Vec<HaircutService>> {
        let query = format!("SELECT {} FROM haircut_services ORDER BY name", RETURNING_COLUMNS);
        let rows = sqlx::query_as::<_, HaircutService>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, data: &HaircutServiceRequest) -> AppResult<HaircutService> {
        let query = format!(
            r#"
            INSERT INTO haircut_services (name, description, price, duration_minutes)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            RETURNING_COLUMNS
        );
        sqlx::query_as::<_, HaircutService>(&query)
            .bind(data.name.trim())
            .bind(&data.description)
            .bind(data.price)
            .bind(data.duration_minutes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraints::translate(e, HAIRCUT_SERVICE_CONSTRAINTS, "create haircut service"))
    }

    async fn update(&self, id: Uuid, data: &HaircutServiceRequest) -> AppResult<HaircutService> {
        let query = format!(
            r#"
            UPDATE haircut_services
            SET name = $2, description = $3, price = $4, duration_minutes = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            RETURNING_COLUMNS
        );
        sqlx::query_as::<_, HaircutService>(&query)
            .bind(id)
            .bind(data.name.trim())
            .bind(&data.description)
            .bind(data.price)
            .bind(data.duration_minutes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| constraints::translate(e, HAIRCUT_SERVICE_CONSTRAINTS, "update haircut service"))?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM haircut_services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| constraints::translate(e, HAIRCUT_SERVICE_CONSTRAINTS, "delete haircut service"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service not found".to_string()));
        }
        Ok(())
    }
}
