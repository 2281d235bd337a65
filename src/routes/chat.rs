use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::ServiceKey;
use crate::db;
use crate::error::AppError;
use crate::models::ChatRoom;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateRoom {
    pub name: String,
    pub description: Option<String>,
}

pub async fn list(
    _key: ServiceKey,
    State(state): State<SharedState>,
) -> Result<Json<Vec<ChatRoom>>, AppError> {
    let rooms = db::chat_rooms::list_active(&state.pool).await?;
    Ok(Json(rooms))
}

pub async fn create(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Json(req): Json<CreateRoom>,
) -> Result<Json<ChatRoom>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let room = db::chat_rooms::create(&state.pool, name, req.description.as_deref()).await?;
    Ok(Json(room))
}

pub async fn delete(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !db::chat_rooms::deactivate(&state.pool, id).await? {
        return Err(AppError::NotFound("Chat room not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
