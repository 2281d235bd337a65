use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::ServiceKey;
use crate::db;
use crate::db::stages::StageFields;
use crate::error::AppError;
use crate::models::ProjectStage;
use crate::state::SharedState;
use crate::sync::{self, BoardOutcome};

#[derive(Deserialize)]
pub struct StageRequest {
    pub name: String,
    pub position: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub value: f64,
}

impl StageRequest {
    fn fields(&self) -> Result<StageFields<'_>, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        if self.value < 0.0 {
            return Err(AppError::BadRequest("value must not be negative".to_string()));
        }
        Ok(StageFields {
            name,
            position: self.position.unwrap_or(0),
            start_date: self.start_date,
            end_date: self.end_date,
            value: self.value,
        })
    }
}

#[derive(Deserialize)]
pub struct CompleteRequest {
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

pub async fn list_by_project(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<ProjectStage>>, AppError> {
    db::projects::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let stages = db::stages::list_by_project(&state.pool, project_id).await?;
    Ok(Json(stages))
}

pub async fn create(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<StageRequest>,
) -> Result<Json<ProjectStage>, AppError> {
    let fields = req.fields()?;

    db::projects::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let stage = db::stages::create(&state.pool, project_id, &fields).await?;
    sync::reconcile_project(&state.pool, project_id).await?;
    Ok(Json(stage))
}

pub async fn update(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StageRequest>,
) -> Result<Json<ProjectStage>, AppError> {
    let fields = req.fields()?;

    let stage = db::stages::update(&state.pool, id, &fields)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Stage not found".to_string()),
            _ => AppError::Database(e),
        })?;
    Ok(Json(stage))
}

pub async fn delete(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project_id = db::stages::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stage not found".to_string()))?;
    sync::reconcile_project(&state.pool, project_id).await?;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

/// Mark a stage complete (`{}` or `{"completed": true}`) or incomplete and
/// move the project to the column matching its progress.
pub async fn complete(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<BoardOutcome>, AppError> {
    let outcome = sync::set_stage_completed(&state.pool, id, req.completed).await?;
    Ok(Json(outcome))
}
