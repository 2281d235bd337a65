use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::auth::extractor::ServiceKey;
use crate::error::AppError;
use crate::state::SharedState;
use crate::webhooks::actions::{self, WebhookAction};

/// Single entry point for webhook management, dispatched on the `action` field.
pub async fn webhooks(
    _key: ServiceKey,
    State(state): State<SharedState>,
    body: Result<Json<WebhookAction>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(action) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let result = actions::execute(&state, action).await?;
    Ok(Json(result))
}
