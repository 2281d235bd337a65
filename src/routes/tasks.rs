use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::extractor::ServiceKey;
use crate::db;
use crate::error::AppError;
use crate::models::{ChecklistItem, Task, TaskStatus};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub content: Option<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    pub project_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub content: Option<String>,
    pub status: String,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

fn checklist_value(items: &[ChecklistItem]) -> Result<Value, AppError> {
    serde_json::to_value(items)
        .map_err(|e| AppError::Internal(format!("Failed to encode checklist: {e}")))
}

pub async fn list(
    _key: ServiceKey,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = db::tasks::list_active(&state.pool).await?;
    Ok(Json(tasks))
}

pub async fn create(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Json(req): Json<CreateTask>,
) -> Result<Json<Task>, AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }

    if let Some(project_id) = req.project_id {
        db::projects::find_by_id(&state.pool, project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    }

    let task = db::tasks::create(
        &state.pool,
        title,
        req.content.as_deref(),
        &checklist_value(&req.checklist)?,
        req.project_id,
    )
    .await?;
    Ok(Json(task))
}

pub async fn get(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    let task = db::tasks::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;
    Ok(Json(task))
}

pub async fn update(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTask>,
) -> Result<Json<Task>, AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }
    let status = TaskStatus::parse(&req.status)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid task status: {}", req.status)))?;

    let task = db::tasks::update(
        &state.pool,
        id,
        title,
        req.content.as_deref(),
        status.as_str(),
        &checklist_value(&req.checklist)?,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Task not found".to_string()),
        _ => AppError::Database(e),
    })?;
    Ok(Json(task))
}
