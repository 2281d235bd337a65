use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{KanbanColumn, Project, ProjectStage};

use super::payload;

/// Queue a consolidated payload for every active webhook subscribed to `event`.
/// Returns the number of queue rows created.
pub async fn enqueue_consolidated(
    pool: &PgPool,
    event: &str,
    project: &Project,
    column: Option<&KanbanColumn>,
    stages: &[ProjectStage],
) -> Result<u64, sqlx::Error> {
    let body = payload::consolidated(event, project, column, stages);
    db::webhook_queue::enqueue_for_subscribers(pool, event, &body).await
}

/// Load a project with its column and stages, then queue its consolidated payload.
pub async fn publish_project(
    pool: &PgPool,
    project_id: Uuid,
    event: &str,
) -> Result<u64, AppError> {
    let project = db::projects::find_by_id(pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let column = match project.kanban_column_id {
        Some(id) => db::kanban_columns::find_by_id(pool, id).await?,
        None => None,
    };
    let stages = db::stages::list_by_project(pool, project.id).await?;

    let queued = enqueue_consolidated(pool, event, &project, column.as_ref(), &stages).await?;
    tracing::debug!("Queued {queued} '{event}' deliveries for project {}", project.id);
    Ok(queued)
}
