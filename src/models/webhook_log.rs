use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct WebhookLog {
    pub id: Uuid,
    pub webhook_id: Option<Uuid>,
    pub event_type: String,
    pub payload: Option<serde_json::Value>,
    pub success: bool,
    pub status_code: Option<i32>,
    pub response_body: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}
