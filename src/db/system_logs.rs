use sqlx::PgPool;

use crate::models::SystemLog;

pub async fn create(
    pool: &PgPool,
    level: &str,
    source: &str,
    message: &str,
    details: Option<&serde_json::Value>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO system_logs (level, source, message, details) VALUES ($1, $2, $3, $4)",
    )
    .bind(level)
    .bind(source)
    .bind(message)
    .bind(details)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<SystemLog>, sqlx::Error> {
    sqlx::query_as::<_, SystemLog>(
        "SELECT * FROM system_logs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
