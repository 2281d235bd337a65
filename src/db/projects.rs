use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Project;

pub struct ProjectFields<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub client_name: Option<&'a str>,
    pub total_value: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn list_active(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE is_active = true ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    fields: &ProjectFields<'_>,
    kanban_column_id: Option<Uuid>,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "INSERT INTO projects
            (name, description, client_name, total_value, start_date, end_date, kanban_column_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(fields.name)
    .bind(fields.description)
    .bind(fields.client_name)
    .bind(fields.total_value)
    .bind(fields.start_date)
    .bind(fields.end_date)
    .bind(kanban_column_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 AND is_active = true")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Lock the project row for the rest of the transaction.
pub async fn find_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE id = $1 AND is_active = true FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    fields: &ProjectFields<'_>,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects
         SET name = $2, description = $3, client_name = $4, total_value = $5,
             start_date = $6, end_date = $7, updated_at = now()
         WHERE id = $1 AND is_active = true RETURNING *",
    )
    .bind(id)
    .bind(fields.name)
    .bind(fields.description)
    .bind(fields.client_name)
    .bind(fields.total_value)
    .bind(fields.start_date)
    .bind(fields.end_date)
    .fetch_one(pool)
    .await
}

pub async fn set_board_position(
    conn: &mut PgConnection,
    id: Uuid,
    kanban_column_id: Option<Uuid>,
    status: &str,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects SET kanban_column_id = $2, status = $3, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(kanban_column_id)
    .bind(status)
    .fetch_one(conn)
    .await
}

/// Soft delete. Returns false when no active project matched.
pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE projects SET is_active = false, updated_at = now()
         WHERE id = $1 AND is_active = true",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
