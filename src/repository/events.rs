//! Haircut events repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::constraints::{self, HAIRCUT_EVENT_CONSTRAINTS};
use crate::{
    error::{AppError, AppResult},
    models::event::{BookingEvent, EventFilter, NewBookingEvent},
};

const SELECT_EVENTS: &str = r#"
    SELECT e.id, e.barber_id, e.customer_id, e.service_type_id,
           e.begin_date_time, e.end_date_time, e.created_at, e.updated_at,
           (b.first_name || ' ' || b.last_name) AS barber_name,
           (c.first_name || ' ' || c.last_name) AS customer_name,
           s.name AS service_name
    FROM haircut_events e
    JOIN users b ON b.id = e.barber_id
    JOIN users c ON c.id = e.customer_id
    JOIN haircut_services s ON s.id = e.service_type_id
"#;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventsRepository: Send + Sync {
    /// Insert an event; overlap and references are checked by the database
    async fn create(&self, event: &NewBookingEvent) -> AppResult<BookingEvent>;

    async fn list(&self, filter: &EventFilter) -> AppResult<Vec<BookingEvent>>;

    /// Events of a barber intersecting [start, end)
    async fn list_for_barber_between(
        &self,
        barber_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<BookingEvent>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<BookingEvent>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct EventsStore {
    pool: Pool<Postgres>,
}

impl EventsStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventsRepository for EventsStore {
    async fn create(&self, event: &NewBookingEvent) -> AppResult<BookingEvent> {
        sqlx::query_as::<_, BookingEvent>(
            r#"
            INSERT INTO haircut_events (begin_date_time, end_date_time, barber_id, customer_id, service_type_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, barber_id, customer_id, service_type_id,
                      begin_date_time, end_date_time, created_at, updated_at,
                      COALESCE((SELECT first_name || ' ' || last_name FROM users WHERE id = barber_id), '') AS barber_name,
                      COALESCE((SELECT first_name || ' ' || last_name FROM users WHERE id = customer_id), '') AS customer_name,
                      COALESCE((SELECT name FROM haircut_services WHERE id = service_type_id), '') AS service_name
            "#,
        )
        .bind(event.begin_date_time)
        .bind(event.end_date_time)
        .bind(event.barber_id)
        .bind(event.customer_id)
        .bind(event.service_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| constraints::translate(e, HAIRCUT_EVENT_CONSTRAINTS, "create haircut event"))
    }

    async fn list(&self, filter: &EventFilter) -> AppResult<Vec<BookingEvent>> {
        let query = format!(
            r#"{}
            WHERE ($1::uuid IS NULL OR e.barber_id = $1)
              AND ($2::uuid IS NULL OR e.customer_id = $2)
              AND ($3::timestamptz IS NULL OR e.end_date_time > $3)
              AND ($4::timestamptz IS NULL OR e.begin_date_time < $4)
            ORDER BY e.begin_date_time
            "#,
            SELECT_EVENTS
        );
        let rows = sqlx::query_as::<_, BookingEvent>(&query)
            .bind(filter.barber_id)
            .bind(filter.customer_id)
            .bind(filter.after)
            .bind(filter.before)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_for_barber_between(
        &self,
        barber_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<BookingEvent>> {
        let query = format!(
            r#"{}
            WHERE e.barber_id = $1
              AND e.begin_date_time < $3
              AND e.end_date_time > $2
            ORDER BY e.begin_date_time
            "#,
            SELECT_EVENTS
        );
        let rows = sqlx::query_as::<_, BookingEvent>(&query)
            .bind(barber_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<BookingEvent> {
        let query = format!("{} WHERE e.id = $1", SELECT_EVENTS);
        sqlx::query_as::<_, BookingEvent>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM haircut_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        Ok(())
    }
}
