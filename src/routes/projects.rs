use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::ServiceKey;
use crate::db;
use crate::db::projects::ProjectFields;
use crate::error::AppError;
use crate::models::Project;
use crate::state::SharedState;
use crate::sync::{self, BoardOutcome};

#[derive(Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    #[serde(default)]
    pub total_value: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kanban_column_id: Option<Uuid>,
}

impl ProjectRequest {
    fn fields(&self) -> Result<ProjectFields<'_>, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(AppError::BadRequest(
                    "end_date must not be before start_date".to_string(),
                ));
            }
        }
        Ok(ProjectFields {
            name,
            description: self.description.as_deref(),
            client_name: self.client_name.as_deref(),
            total_value: self.total_value,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub column_id: Uuid,
}

pub async fn list(
    _key: ServiceKey,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = db::projects::list_active(&state.pool).await?;
    Ok(Json(projects))
}

/// Create a project. A `kanban_column_id` only places the card; stage
/// propagation happens through the move endpoint.
pub async fn create(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Json(req): Json<ProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let fields = req.fields()?;

    if let Some(column_id) = req.kanban_column_id {
        db::kanban_columns::find_by_id(&state.pool, column_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Kanban column not found".to_string()))?;
    }

    let project = db::projects::create(&state.pool, &fields, req.kanban_column_id).await?;
    tracing::info!("Project {} created", project.id);
    Ok(Json(project))
}

pub async fn get(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    let project = db::projects::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

pub async fn update(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let fields = req.fields()?;

    let project = db::projects::update(&state.pool, id, &fields)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Project not found".to_string()),
            _ => AppError::Database(e),
        })?;
    Ok(Json(project))
}

pub async fn delete(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !db::projects::deactivate(&state.pool, id).await? {
        return Err(AppError::NotFound("Project not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn move_to_column(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<BoardOutcome>, AppError> {
    let outcome = sync::move_project_to_column(&state.pool, id, req.column_id).await?;
    Ok(Json(outcome))
}
