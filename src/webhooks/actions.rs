use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::db;
use crate::db::webhook_logs::NewWebhookLog;
use crate::error::AppError;
use crate::middleware::system_log::{self, Level};
use crate::state::SharedState;

use super::{drain, payload, publish};

static EVENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*$").unwrap());

/// Request body of the webhooks function, dispatched on its `action` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WebhookAction {
    SendProjectWebhook {
        project_id: Uuid,
        event: Option<String>,
    },
    List,
    Register {
        name: String,
        url: String,
        #[serde(default)]
        events: Vec<String>,
    },
    Delete {
        webhook_id: Uuid,
    },
    Test {
        webhook_id: Uuid,
    },
    Process {
        batch_size: Option<i64>,
    },
    SetupTriggers,
    TriggerTest,
    ToggleActive {
        webhook_id: Uuid,
        is_active: Option<bool>,
    },
}

impl WebhookAction {
    pub fn name(&self) -> &'static str {
        match self {
            WebhookAction::SendProjectWebhook { .. } => "send_project_webhook",
            WebhookAction::List => "list",
            WebhookAction::Register { .. } => "register",
            WebhookAction::Delete { .. } => "delete",
            WebhookAction::Test { .. } => "test",
            WebhookAction::Process { .. } => "process",
            WebhookAction::SetupTriggers => "setup_triggers",
            WebhookAction::TriggerTest => "trigger_test",
            WebhookAction::ToggleActive { .. } => "toggle_active",
        }
    }
}

pub async fn execute(state: &SharedState, action: WebhookAction) -> Result<Value, AppError> {
    let pool = &state.pool;
    tracing::debug!("Webhook action '{}'", action.name());

    match action {
        WebhookAction::SendProjectWebhook { project_id, event } => {
            let event = event.unwrap_or_else(|| payload::PROJECT_CONSOLIDATED.to_string());
            validate_event(&event)?;
            let queued = publish::publish_project(pool, project_id, &event).await?;
            Ok(json!({ "success": true, "queued": queued }))
        }

        WebhookAction::List => {
            let webhooks = db::webhooks::list(pool).await?;
            Ok(json!({ "success": true, "webhooks": webhooks }))
        }

        WebhookAction::Register { name, url, events } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::BadRequest("name is required".to_string()));
            }
            validate_url(&url)?;
            for event in &events {
                validate_event(event)?;
            }

            let webhook = db::webhooks::create(pool, name, &url, &events).await?;
            system_log::record(
                pool,
                Level::Info,
                "webhooks",
                &format!("Webhook '{}' registered", webhook.name),
                Some(json!({ "webhook_id": webhook.id, "url": webhook.url })),
            )
            .await;
            Ok(json!({ "success": true, "webhook": webhook }))
        }

        WebhookAction::Delete { webhook_id } => {
            if !db::webhooks::delete(pool, webhook_id).await? {
                return Err(AppError::NotFound("Webhook not found".to_string()));
            }
            system_log::record(
                pool,
                Level::Info,
                "webhooks",
                "Webhook deleted",
                Some(json!({ "webhook_id": webhook_id })),
            )
            .await;
            Ok(json!({ "success": true }))
        }

        WebhookAction::Test { webhook_id } => {
            let webhook = db::webhooks::find_by_id(pool, webhook_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Webhook not found".to_string()))?;

            let body = payload::test_payload(&webhook.name);
            let delivery = state
                .webhook_client
                .deliver(&webhook.url, payload::WEBHOOK_TEST, &body)
                .await;

            db::webhook_logs::create(
                pool,
                &NewWebhookLog {
                    webhook_id: Some(webhook.id),
                    event_type: payload::WEBHOOK_TEST,
                    payload: Some(&body),
                    success: delivery.success,
                    status_code: delivery.status_code.map(i32::from),
                    response_body: delivery.body.as_deref(),
                    error: delivery.error.as_deref(),
                },
            )
            .await?;

            Ok(json!({
                "success": delivery.success,
                "status_code": delivery.status_code,
                "error": delivery.error,
            }))
        }

        WebhookAction::Process { batch_size } => {
            let batch_size = batch_size
                .unwrap_or(state.config.queue_batch_size)
                .clamp(1, 100);
            let summary =
                drain::process_queue(pool, &state.webhook_client, batch_size).await?;
            Ok(json!({ "success": true, "summary": summary }))
        }

        WebhookAction::SetupTriggers => {
            let triggers = db::triggers::install(pool).await?;
            system_log::record(
                pool,
                Level::Info,
                "webhooks",
                "Row-change webhook triggers installed",
                Some(json!({ "triggers": triggers })),
            )
            .await;
            Ok(json!({ "success": true, "triggers": triggers }))
        }

        WebhookAction::TriggerTest => {
            let body = payload::test_payload("all active webhooks");
            let queued =
                db::webhook_queue::enqueue_for_subscribers(pool, payload::WEBHOOK_TEST, &body)
                    .await?;
            Ok(json!({ "success": true, "queued": queued }))
        }

        WebhookAction::ToggleActive {
            webhook_id,
            is_active,
        } => {
            let webhook = db::webhooks::set_active(pool, webhook_id, is_active)
                .await?
                .ok_or_else(|| AppError::NotFound("Webhook not found".to_string()))?;
            Ok(json!({ "success": true, "webhook": webhook }))
        }
    }
}

fn validate_url(url: &str) -> Result<(), AppError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook url: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::BadRequest(format!(
            "Unsupported webhook url scheme: {other}"
        ))),
    }
}

fn validate_event(event: &str) -> Result<(), AppError> {
    if EVENT_NAME_RE.is_match(event) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid event name: {event}")))
    }
}
