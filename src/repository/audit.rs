//! Staff activity audit log

use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::AppResult;

/// Record an administrative action; call inside the transaction of the write it describes
pub async fn insert_staff_activity(
    conn: &mut PgConnection,
    staff_id: Uuid,
    description: &str,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO staff_activity_logs (staff_id, activity_description) VALUES ($1, $2)",
    )
    .bind(staff_id)
    .bind(description)
    .execute(conn)
    .await?;
    Ok(())
}
