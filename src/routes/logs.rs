use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::ServiceKey;
use crate::db;
use crate::error::AppError;
use crate::models::{SystemLog, WebhookLog};
use crate::state::SharedState;

use super::PageParams;

pub async fn webhook_logs(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<WebhookLog>>, AppError> {
    db::webhooks::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Webhook not found".to_string()))?;

    let (limit, offset) = params.limit_offset();
    let logs = db::webhook_logs::list_by_webhook(&state.pool, id, limit, offset).await?;
    Ok(Json(logs))
}

pub async fn system_logs(
    _key: ServiceKey,
    State(state): State<SharedState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<SystemLog>>, AppError> {
    let (limit, offset) = params.limit_offset();
    let logs = db::system_logs::list(&state.pool, limit, offset).await?;
    Ok(Json(logs))
}
