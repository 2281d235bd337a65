use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::KanbanColumn;

pub async fn list(pool: &PgPool) -> Result<Vec<KanbanColumn>, sqlx::Error> {
    sqlx::query_as::<_, KanbanColumn>(
        "SELECT * FROM kanban_columns ORDER BY position ASC, created_at ASC",
    )
    .fetch_all(pool)
    .await
}

/// Same ordering as [`list`], read inside an open transaction.
pub async fn list_in(conn: &mut PgConnection) -> Result<Vec<KanbanColumn>, sqlx::Error> {
    sqlx::query_as::<_, KanbanColumn>(
        "SELECT * FROM kanban_columns ORDER BY position ASC, created_at ASC",
    )
    .fetch_all(conn)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<KanbanColumn>, sqlx::Error> {
    sqlx::query_as::<_, KanbanColumn>("SELECT * FROM kanban_columns WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    title: &str,
    position: i32,
    color: Option<&str>,
    is_completion: bool,
    is_cancellation: bool,
) -> Result<KanbanColumn, sqlx::Error> {
    sqlx::query_as::<_, KanbanColumn>(
        "INSERT INTO kanban_columns (title, position, color, is_completion, is_cancellation)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(title)
    .bind(position)
    .bind(color)
    .bind(is_completion)
    .bind(is_cancellation)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    position: i32,
    color: Option<&str>,
    is_completion: bool,
    is_cancellation: bool,
) -> Result<KanbanColumn, sqlx::Error> {
    sqlx::query_as::<_, KanbanColumn>(
        "UPDATE kanban_columns
         SET title = $2, position = $3, color = $4, is_completion = $5, is_cancellation = $6
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(title)
    .bind(position)
    .bind(color)
    .bind(is_completion)
    .bind(is_cancellation)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM kanban_columns WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
