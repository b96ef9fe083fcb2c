//! Barber working hours repository

use async_trait::async_trait;
use chrono::NaiveTime;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::constraints::{self, AVAILABILITY_CONSTRAINTS};
use crate::{
    error::{AppError, AppResult},
    models::availability::{NewWorkingHours, WorkingHoursWindow},
};

const WINDOW_COLUMNS: &str =
    "id, barber_id, day_of_week, start_time, end_time, is_active, created_at, updated_at";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Active windows of a barber for one weekday, ordered by start time
    async fn list_active_for_day(
        &self,
        barber_id: Uuid,
        day_of_week: i16,
    ) -> AppResult<Vec<WorkingHoursWindow>>;

    /// Every window of a barber, active or not
    async fn list_for_barber(&self, barber_id: Uuid) -> AppResult<Vec<WorkingHoursWindow>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<WorkingHoursWindow>;

    async fn create(&self, barber_id: Uuid, window: &NewWorkingHours) -> AppResult<WorkingHoursWindow>;

    /// Insert or replace windows keyed by (day_of_week, start_time), all or nothing
    async fn upsert_many(
        &self,
        barber_id: Uuid,
        windows: &[NewWorkingHours],
    ) -> AppResult<Vec<WorkingHoursWindow>>;

    async fn update(
        &self,
        id: Uuid,
        start_time: NaiveTime,
        end_time: NaiveTime,
        is_active: bool,
    ) -> AppResult<WorkingHoursWindow>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AvailabilityStore {
    pool: Pool<Postgres>,
}

impl AvailabilityStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for AvailabilityStore {
    async fn list_active_for_day(
        &self,
        barber_id: Uuid,
        day_of_week: i16,
    ) -> AppResult<Vec<WorkingHoursWindow>> {
        let query = format!(
            "SELECT {} FROM barber_availability \
             WHERE barber_id = $1 AND day_of_week = $2 AND is_active \
             ORDER BY start_time",
            WINDOW_COLUMNS
        );
        let rows = sqlx::query_as::<_, WorkingHoursWindow>(&query)
            .bind(barber_id)
            .bind(day_of_week)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_for_barber(&self, barber_id: Uuid) -> AppResult<Vec<WorkingHoursWindow>> {
        let query = format!(
            "SELECT {} FROM barber_availability WHERE barber_id = $1 ORDER BY day_of_week, start_time",
            WINDOW_COLUMNS
        );
        let rows = sqlx::query_as::<_, WorkingHoursWindow>(&query)
            .bind(barber_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<WorkingHoursWindow> {
        let query = format!("SELECT {} FROM barber_availability WHERE id = $1", WINDOW_COLUMNS);
        sqlx::query_as::<_, WorkingHoursWindow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Availability record not found".to_string()))
    }

    async fn create(&self, barber_id: Uuid, window: &NewWorkingHours) -> AppResult<WorkingHoursWindow> {
        let query = format!(
            r#"
            INSERT INTO barber_availability (barber_id, day_of_week, start_time, end_time, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            WINDOW_COLUMNS
        );
        sqlx::query_as::<_, WorkingHoursWindow>(&query)
            .bind(barber_id)
            .bind(window.day_of_week)
            .bind(window.start_time)
            .bind(window.end_time)
            .bind(window.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraints::translate(e, AVAILABILITY_CONSTRAINTS, "create barber availability"))
    }

    async fn upsert_many(
        &self,
        barber_id: Uuid,
        windows: &[NewWorkingHours],
    ) -> AppResult<Vec<WorkingHoursWindow>> {
        let query = format!(
            r#"
            INSERT INTO barber_availability (barber_id, day_of_week, start_time, end_time, is_active)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (barber_id, day_of_week, start_time) DO UPDATE
            SET end_time = EXCLUDED.end_time,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            RETURNING {}
            "#,
            WINDOW_COLUMNS
        );

        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(windows.len());
        for window in windows {
            let row = sqlx::query_as::<_, WorkingHoursWindow>(&query)
                .bind(barber_id)
                .bind(window.day_of_week)
                .bind(window.start_time)
                .bind(window.end_time)
                .bind(window.is_active)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    constraints::translate(e, AVAILABILITY_CONSTRAINTS, "upsert barber availability")
                })?;
            saved.push(row);
        }
        tx.commit().await?;
        Ok(saved)
    }

    async fn update(
        &self,
        id: Uuid,
        start_time: NaiveTime,
        end_time: NaiveTime,
        is_active: bool,
    ) -> AppResult<WorkingHoursWindow> {
        let query = format!(
            r#"
            UPDATE barber_availability
            SET start_time = $2, end_time = $3, is_active = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            WINDOW_COLUMNS
        );
        sqlx::query_as::<_, WorkingHoursWindow>(&query)
            .bind(id)
            .bind(start_time)
            .bind(end_time)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| constraints::translate(e, AVAILABILITY_CONSTRAINTS, "update barber availability"))?
            .ok_or_else(|| AppError::NotFound("Availability record not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM barber_availability WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Availability record not found".to_string()));
        }
        Ok(())
    }
}
