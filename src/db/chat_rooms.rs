use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ChatRoom;

pub async fn list_active(pool: &PgPool) -> Result<Vec<ChatRoom>, sqlx::Error> {
    sqlx::query_as::<_, ChatRoom>(
        "SELECT * FROM chat_rooms WHERE is_active = true ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<ChatRoom, sqlx::Error> {
    sqlx::query_as::<_, ChatRoom>(
        "INSERT INTO chat_rooms (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

/// Soft delete. Returns false when no active room matched.
pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE chat_rooms SET is_active = false WHERE id = $1 AND is_active = true",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
