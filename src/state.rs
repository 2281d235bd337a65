use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::webhooks::client::WebhookClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub webhook_client: WebhookClient,
    /// SHA-256 of the configured service key.
    pub service_key_digest: [u8; 32],
}
