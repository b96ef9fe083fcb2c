//! Barber service offerings repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::constraints::{self, BARBER_SERVICE_CONSTRAINTS};
use crate::{
    error::{AppError, AppResult},
    models::barber_service::BarberService,
};

const SELECT_BARBER_SERVICES: &str = r#"
    SELECT bs.id, bs.barber_id, bs.service_id AS service_type_id,
           hs.name AS haircut_name, hs.duration_minutes,
           (u.first_name || ' ' || u.last_name) AS barber_name,
           bs.created_at, bs.updated_at
    FROM barber_services bs
    JOIN users u ON u.id = bs.barber_id
    JOIN haircut_services hs ON hs.id = bs.service_id
"#;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait BarberServicesRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<BarberService>>;

    /// Services one barber offers, ordered by name
    async fn list_for_barber(&self, barber_id: Uuid) -> AppResult<Vec<BarberService>>;

    /// Link a barber to a haircut service; duplicates and unknown ids are rejected by the database
    async fn create(&self, barber_id: Uuid, service_id: Uuid) -> AppResult<BarberService>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct BarberServicesStore {
    pool: Pool<Postgres>,
}

impl BarberServicesStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BarberServicesRepository for BarberServicesStore {
    async fn list(&self) -> AppResult<Vec<BarberService>> {
        let query = format!("{} ORDER BY barber_name, hs.name", SELECT_BARBER_SERVICES);
        let rows = sqlx::query_as::<_, BarberService>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_for_barber(&self, barber_id: Uuid) -> AppResult<Vec<BarberService>> {
        let query = format!("{} WHERE bs.barber_id = $1 ORDER BY hs.name", SELECT_BARBER_SERVICES);
        let rows = sqlx::query_as::<_, BarberService>(&query)
            .bind(barber_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, barber_id: Uuid, service_id: Uuid) -> AppResult<BarberService> {
        sqlx::query_as::<_, BarberService>(
            r#"
            WITH inserted AS (
                INSERT INTO barber_services (barber_id, service_id)
                VALUES ($1, $2)
                RETURNING id, barber_id, service_id, created_at, updated_at
            )
            SELECT bs.id, bs.barber_id, bs.service_id AS service_type_id,
                   hs.name AS haircut_name, hs.duration_minutes,
                   (u.first_name || ' ' || u.last_name) AS barber_name,
                   bs.created_at, bs.updated_at
            FROM inserted bs
            JOIN users u ON u.id = bs.barber_id
            JOIN haircut_services hs ON hs.id = bs.service_id
            "#,
        )
        .bind(barber_id)
        .bind(service_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| constraints::translate(e, BARBER_SERVICE_CONSTRAINTS, "create barber service"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM barber_services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Barber service not found".to_string()));
        }
        Ok(())
    }
}
