use serde::Serialize;
use sqlx::PgPool;

use crate::db;
use crate::db::webhook_logs::NewWebhookLog;
use crate::models::WebhookQueueItem;

use super::client::{Delivery, WebhookClient};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DrainSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Claim up to `batch_size` queued deliveries and attempt each exactly once.
/// Claimed rows are already gone from the queue, so a failed delivery is
/// dropped and only its log entry remains.
pub async fn process_queue(
    pool: &PgPool,
    client: &WebhookClient,
    batch_size: i64,
) -> Result<DrainSummary, sqlx::Error> {
    let items = db::webhook_queue::claim_batch(pool, batch_size).await?;
    let mut summary = DrainSummary::default();

    for item in &items {
        let ok = deliver_item(pool, client, item).await;
        summary.processed += 1;
        if ok {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
    }

    if summary.processed > 0 {
        tracing::info!(
            "Webhook queue drained: {} processed, {} succeeded, {} failed",
            summary.processed,
            summary.succeeded,
            summary.failed
        );
    }

    Ok(summary)
}

async fn deliver_item(pool: &PgPool, client: &WebhookClient, item: &WebhookQueueItem) -> bool {
    let webhook = match db::webhooks::find_by_id(pool, item.webhook_id).await {
        Ok(webhook) => webhook,
        Err(e) => {
            let error = format!("Failed to load webhook: {e}");
            write_log(pool, None, item, &failure(error)).await;
            return false;
        }
    };

    let webhook = match webhook {
        Some(w) if w.is_active => w,
        Some(w) => {
            write_log(pool, Some(w.id), item, &failure("Webhook is inactive".to_string())).await;
            return false;
        }
        None => {
            let error = format!("Webhook {} not found", item.webhook_id);
            write_log(pool, None, item, &failure(error)).await;
            return false;
        }
    };

    tracing::debug!(
        "Delivering queue item {} (webhook={}, event={})",
        item.id,
        webhook.id,
        item.event_type
    );

    let delivery = client
        .deliver(&webhook.url, &item.event_type, &item.payload)
        .await;

    if !delivery.success {
        tracing::warn!(
            "Webhook {} delivery failed: {}",
            webhook.id,
            delivery.error.as_deref().unwrap_or("unknown error")
        );
    }

    write_log(pool, Some(webhook.id), item, &delivery).await;
    delivery.success
}

fn failure(error: String) -> Delivery {
    Delivery {
        success: false,
        status_code: None,
        body: None,
        error: Some(error),
    }
}

async fn write_log(
    pool: &PgPool,
    webhook_id: Option<uuid::Uuid>,
    item: &WebhookQueueItem,
    delivery: &Delivery,
) {
    let entry = NewWebhookLog {
        webhook_id,
        event_type: &item.event_type,
        payload: Some(&item.payload),
        success: delivery.success,
        status_code: delivery.status_code.map(i32::from),
        response_body: delivery.body.as_deref(),
        error: delivery.error.as_deref(),
    };
    if let Err(e) = db::webhook_logs::create(pool, &entry).await {
        tracing::error!("Failed to write webhook log for queue item {}: {e}", item.id);
    }
}
