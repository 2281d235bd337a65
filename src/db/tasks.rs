use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Task;

pub async fn list_active(pool: &PgPool) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE is_active = true ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    title: &str,
    content: Option<&str>,
    checklist: &serde_json::Value,
    project_id: Option<Uuid>,
) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (title, content, checklist, project_id)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(title)
    .bind(content)
    .bind(checklist)
    .bind(project_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND is_active = true")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE project_id = $1 AND is_active = true ORDER BY created_at ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_title(pool: &PgPool, title: &str) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE title = $1 AND is_active = true ORDER BY created_at ASC",
    )
    .bind(title)
    .fetch_all(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    content: Option<&str>,
    status: &str,
    checklist: &serde_json::Value,
) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET title = $2, content = $3, status = $4, checklist = $5, updated_at = now()
         WHERE id = $1 AND is_active = true RETURNING *",
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .bind(status)
    .bind(checklist)
    .fetch_one(pool)
    .await
}

pub async fn set_progress(
    pool: &PgPool,
    id: Uuid,
    status: &str,
    checklist: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE tasks SET status = $2, checklist = $3, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status)
        .bind(checklist)
        .execute(pool)
        .await?;
    Ok(())
}
