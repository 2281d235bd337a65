use sqlx::PgPool;
use uuid::Uuid;

use crate::models::WebhookLog;

pub struct NewWebhookLog<'a> {
    pub webhook_id: Option<Uuid>,
    pub event_type: &'a str,
    pub payload: Option<&'a serde_json::Value>,
    pub success: bool,
    pub status_code: Option<i32>,
    pub response_body: Option<&'a str>,
    pub error: Option<&'a str>,
}

pub async fn create(pool: &PgPool, entry: &NewWebhookLog<'_>) -> Result<WebhookLog, sqlx::Error> {
    sqlx::query_as::<_, WebhookLog>(
        "INSERT INTO webhook_logs
            (webhook_id, event_type, payload, success, status_code, response_body, error)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(entry.webhook_id)
    .bind(entry.event_type)
    .bind(entry.payload)
    .bind(entry.success)
    .bind(entry.status_code)
    .bind(entry.response_body)
    .bind(entry.error)
    .fetch_one(pool)
    .await
}

pub async fn list_by_webhook(
    pool: &PgPool,
    webhook_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<WebhookLog>, sqlx::Error> {
    sqlx::query_as::<_, WebhookLog>(
        "SELECT * FROM webhook_logs WHERE webhook_id = $1
         ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(webhook_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
