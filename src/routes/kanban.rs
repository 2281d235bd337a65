use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::ServiceKey;
use crate::db;
use crate::error::AppError;
use crate::models::KanbanColumn;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ColumnRequest {
    pub title: String,
    pub position: Option<i32>,
    pub color: Option<String>,
    #[serde(default)]
    pub is_completion: bool,
    #[serde(default)]
    pub is_cancellation: bool,
}

impl ColumnRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        if self.is_completion && self.is_cancellation {
            return Err(AppError::BadRequest(
                "A column cannot be both a completion and a cancellation column".to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn list(
    _key: ServiceKey,
    State(state): State<SharedState>,
) -> Result<Json<Vec<KanbanColumn>>, AppError> {
    let columns = db::kanban_columns::list(&state.pool).await?;
    Ok(Json(columns))
}

pub async fn create(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Json(req): Json<ColumnRequest>,
) -> Result<Json<KanbanColumn>, AppError> {
    req.validate()?;

    let column = db::kanban_columns::create(
        &state.pool,
        req.title.trim(),
        req.position.unwrap_or(0),
        req.color.as_deref(),
        req.is_completion,
        req.is_cancellation,
    )
    .await?;
    Ok(Json(column))
}

pub async fn update(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ColumnRequest>,
) -> Result<Json<KanbanColumn>, AppError> {
    req.validate()?;

    let column = db::kanban_columns::update(
        &state.pool,
        id,
        req.title.trim(),
        req.position.unwrap_or(0),
        req.color.as_deref(),
        req.is_completion,
        req.is_cancellation,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Kanban column not found".to_string()),
        _ => AppError::Database(e),
    })?;
    Ok(Json(column))
}

pub async fn delete(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !db::kanban_columns::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Kanban column not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
