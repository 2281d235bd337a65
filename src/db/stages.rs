use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::ProjectStage;

pub struct StageFields<'a> {
    pub name: &'a str,
    pub position: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub value: f64,
}

pub async fn list_by_project(
    pool: &PgPool,
    project_id: Uuid,
) -> Result<Vec<ProjectStage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectStage>(
        "SELECT * FROM project_stages WHERE project_id = $1
         ORDER BY position ASC, created_at ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_project_in(
    conn: &mut PgConnection,
    project_id: Uuid,
) -> Result<Vec<ProjectStage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectStage>(
        "SELECT * FROM project_stages WHERE project_id = $1
         ORDER BY position ASC, created_at ASC",
    )
    .bind(project_id)
    .fetch_all(conn)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProjectStage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectStage>("SELECT * FROM project_stages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    project_id: Uuid,
    fields: &StageFields<'_>,
) -> Result<ProjectStage, sqlx::Error> {
    sqlx::query_as::<_, ProjectStage>(
        "INSERT INTO project_stages (project_id, name, position, start_date, end_date, value)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(project_id)
    .bind(fields.name)
    .bind(fields.position)
    .bind(fields.start_date)
    .bind(fields.end_date)
    .bind(fields.value)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    fields: &StageFields<'_>,
) -> Result<ProjectStage, sqlx::Error> {
    sqlx::query_as::<_, ProjectStage>(
        "UPDATE project_stages
         SET name = $2, position = $3, start_date = $4, end_date = $5, value = $6,
             updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(fields.name)
    .bind(fields.position)
    .bind(fields.start_date)
    .bind(fields.end_date)
    .bind(fields.value)
    .fetch_one(pool)
    .await
}

pub async fn set_progress(
    conn: &mut PgConnection,
    id: Uuid,
    completed: bool,
    status: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE project_stages SET completed = $2, status = $3, updated_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .bind(completed)
    .bind(status)
    .execute(conn)
    .await?;
    Ok(())
}

/// Returns the owning project id, or `None` if no such stage existed.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("DELETE FROM project_stages WHERE id = $1 RETURNING project_id")
        .bind(id)
        .fetch_optional(pool)
        .await
}
