use sqlx::PgPool;

use crate::models::WebhookQueueItem;

/// Enqueue one row per active webhook subscribed to `event_type`.
/// Returns the number of rows queued.
pub async fn enqueue_for_subscribers(
    pool: &PgPool,
    event_type: &str,
    payload: &serde_json::Value,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO webhook_queue (webhook_id, event_type, payload)
         SELECT id, $1::text, $2::jsonb FROM webhooks
         WHERE is_active = true AND (cardinality(events) = 0 OR $1::text = ANY(events))",
    )
    .bind(event_type)
    .bind(payload)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Atomically remove and return up to `limit` of the oldest rows.
/// SKIP LOCKED keeps concurrent drains from claiming the same row.
pub async fn claim_batch(pool: &PgPool, limit: i64) -> Result<Vec<WebhookQueueItem>, sqlx::Error> {
    sqlx::query_as::<_, WebhookQueueItem>(
        "DELETE FROM webhook_queue
         WHERE id IN (
             SELECT id FROM webhook_queue
             ORDER BY created_at ASC
             LIMIT $1
             FOR UPDATE SKIP LOCKED
         )
         RETURNING *",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM webhook_queue")
        .fetch_one(pool)
        .await
}
