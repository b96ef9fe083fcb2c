//! Customer membership lookups

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::error::AppResult;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MembershipsRepository: Send + Sync {
    /// Plan of the customer's most recent active membership
    async fn active_plan_for_customer(&self, customer_id: Uuid) -> AppResult<Option<Uuid>>;
}

#[derive(Clone)]
pub struct MembershipsStore {
    pool: Pool<Postgres>,
}

impl MembershipsStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipsRepository for MembershipsStore {
    async fn active_plan_for_customer(&self, customer_id: Uuid) -> AppResult<Option<Uuid>> {
        let plan = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT membership_plan_id
            FROM customer_memberships
            WHERE customer_id = $1 AND status = 'active'
            ORDER BY start_date DESC
            LIMIT 1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }
}
