pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod sync;
pub mod webhooks;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::webhooks::client::WebhookClient;

pub fn build_app(pool: PgPool, config: Config) -> Result<(Router, SharedState), String> {
    let webhook_client = WebhookClient::new(Duration::from_secs(config.webhook_timeout_secs))?;
    let service_key_digest = auth::extractor::digest(&config.service_key);

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        webhook_client,
        service_key_digest,
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .merge(routes::function_routes())
        .route("/health", axum::routing::get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state.clone());

    Ok((app, state))
}

async fn health() -> &'static str {
    "ok"
}
