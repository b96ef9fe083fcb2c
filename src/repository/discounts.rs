//! Discounts repository

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::{
    audit,
    constraints::{self, DISCOUNT_CONSTRAINTS},
};
use crate::{
    error::{AppError, AppResult},
    models::discount::{Discount, DiscountRequest},
};

const SELECT_DISCOUNTS: &str = r#"
    SELECT d.id, d.name, d.description, d.discount_type, d.discount_percent,
           d.discount_amount, d.is_use_unlimited, d.use_per_client, d.is_active,
           d.valid_from, d.valid_to, d.max_redemptions, d.times_redeemed,
           ARRAY(
               SELECT membership_plan_id FROM discount_restricted_plans
               WHERE discount_id = d.id ORDER BY membership_plan_id
           ) AS restricted_plan_ids,
           d.created_at, d.updated_at
    FROM discounts d
"#;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DiscountsRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Discount>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Discount>;

    /// Discount by exact name, only if active and inside its validity range
    async fn get_active_by_name(&self, name: &str) -> AppResult<Option<Discount>>;

    async fn create(&self, request: &DiscountRequest, staff_id: Uuid) -> AppResult<Discount>;

    async fn update(&self, id: Uuid, request: &DiscountRequest, staff_id: Uuid) -> AppResult<Discount>;

    async fn delete(&self, id: Uuid, staff_id: Uuid) -> AppResult<()>;

    /// Times the customer has redeemed the discount (0 if never)
    async fn usage_count(&self, customer_id: Uuid, discount_id: Uuid) -> AppResult<i32>;

    /// Count one redemption unless it would exceed `cap`.
    ///
    /// Returns the new usage count, or `None` when the cap was already reached.
    /// The check and the increment are a single statement, so concurrent
    /// redemptions cannot both pass the cap.
    async fn record_usage(
        &self,
        customer_id: Uuid,
        discount_id: Uuid,
        cap: Option<i32>,
    ) -> AppResult<Option<i32>>;
}

#[derive(Clone)]
pub struct DiscountsStore {
    pool: Pool<Postgres>,
}

impl DiscountsStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn replace_restricted_plans(
        conn: &mut PgConnection,
        discount_id: Uuid,
        plan_ids: &[Uuid],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM discount_restricted_plans WHERE discount_id = $1")
            .bind(discount_id)
            .execute(&mut *conn)
            .await?;

        if plan_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO discount_restricted_plans (discount_id, membership_plan_id)
            SELECT $1, plan_id FROM UNNEST($2::uuid[]) AS plan_id
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(discount_id)
        .bind(plan_ids)
        .execute(&mut *conn)
        .await
        .map_err(|e| constraints::translate(e, DISCOUNT_CONSTRAINTS, "set discount membership plans"))?;
        Ok(())
    }

    async fn fetch(conn: &mut PgConnection, id: Uuid) -> AppResult<Discount> {
        let query = format!("{} WHERE d.id = $1", SELECT_DISCOUNTS);
        sqlx::query_as::<_, Discount>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Discount not found".to_string()))
    }
}

#[async_trait]
impl DiscountsRepository for DiscountsStore {
    async fn list(&self) -> AppResult<Vec<Discount>> {
        let query = format!("{} ORDER BY d.name", SELECT_DISCOUNTS);
        let rows = sqlx::query_as::<_, Discount>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Discount> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch(&mut *conn, id).await
    }

    async fn get_active_by_name(&self, name: &str) -> AppResult<Option<Discount>> {
        let query = format!(
            r#"{}
            WHERE d.name = $1
              AND d.is_active
              AND d.valid_from <= NOW()
              AND (d.valid_to IS NULL OR d.valid_to >= NOW())
            "#,
            SELECT_DISCOUNTS
        );
        let discount = sqlx::query_as::<_, Discount>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(discount)
    }

    async fn create(&self, request: &DiscountRequest, staff_id: Uuid) -> AppResult<Discount> {
        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO discounts (
                name, description, discount_type, discount_percent, discount_amount,
                is_use_unlimited, use_per_client, is_active, valid_from, valid_to, max_redemptions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.discount_type)
        .bind(request.discount_percent)
        .bind(request.discount_amount)
        .bind(request.is_use_unlimited)
        .bind(request.use_per_client)
        .bind(request.is_active)
        .bind(request.valid_from)
        .bind(request.valid_to)
        .bind(request.max_redemptions)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| constraints::translate(e, DISCOUNT_CONSTRAINTS, "create discount"))?;

        Self::replace_restricted_plans(&mut *tx, id, &request.restricted_plan_ids).await?;
        audit::insert_staff_activity(&mut *tx, staff_id, &format!("Created discount: {}", request.name))
            .await?;

        let discount = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(discount)
    }

    async fn update(&self, id: Uuid, request: &DiscountRequest, staff_id: Uuid) -> AppResult<Discount> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE discounts
            SET name = $2, description = $3, discount_type = $4, discount_percent = $5,
                discount_amount = $6, is_use_unlimited = $7, use_per_client = $8,
                is_active = $9, valid_from = $10, valid_to = $11, max_redemptions = $12,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.discount_type)
        .bind(request.discount_percent)
        .bind(request.discount_amount)
        .bind(request.is_use_unlimited)
        .bind(request.use_per_client)
        .bind(request.is_active)
        .bind(request.valid_from)
        .bind(request.valid_to)
        .bind(request.max_redemptions)
        .execute(&mut *tx)
        .await
        .map_err(|e| constraints::translate(e, DISCOUNT_CONSTRAINTS, "update discount"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Discount not found".to_string()));
        }

        Self::replace_restricted_plans(&mut *tx, id, &request.restricted_plan_ids).await?;
        audit::insert_staff_activity(&mut *tx, staff_id, &format!("Updated discount: {}", request.name))
            .await?;

        let discount = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(discount)
    }

    async fn delete(&self, id: Uuid, staff_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let name: Option<String> = sqlx::query_scalar("DELETE FROM discounts WHERE id = $1 RETURNING name")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let name = name.ok_or_else(|| AppError::NotFound("Discount not found".to_string()))?;

        audit::insert_staff_activity(&mut *tx, staff_id, &format!("Deleted discount: {}", name)).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn usage_count(&self, customer_id: Uuid, discount_id: Uuid) -> AppResult<i32> {
        let count: Option<i32> = sqlx::query_scalar(
            "SELECT usage_count FROM customer_discount_usage WHERE customer_id = $1 AND discount_id = $2",
        )
        .bind(customer_id)
        .bind(discount_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    async fn record_usage(
        &self,
        customer_id: Uuid,
        discount_id: Uuid,
        cap: Option<i32>,
    ) -> AppResult<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        let count: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO customer_discount_usage (customer_id, discount_id, usage_count, last_used_at)
            SELECT $1, $2, 1, NOW()
            WHERE $3::int IS NULL OR $3::int > 0
            ON CONFLICT (customer_id, discount_id) DO UPDATE
            SET usage_count = customer_discount_usage.usage_count + 1,
                last_used_at = NOW()
            WHERE $3::int IS NULL OR customer_discount_usage.usage_count < $3::int
            RETURNING usage_count
            "#,
        )
        .bind(customer_id)
        .bind(discount_id)
        .bind(cap)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(count) = count else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE discounts SET times_redeemed = times_redeemed + 1 WHERE id = $1")
            .bind(discount_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(count))
    }
}
