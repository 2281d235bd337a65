pub mod chat;
pub mod functions;
pub mod kanban;
pub mod logs;
pub mod projects;
pub mod stages;
pub mod tasks;

use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Deserialize;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Kanban
        .route(
            "/api/v1/kanban/columns",
            get(kanban::list).post(kanban::create),
        )
        .route(
            "/api/v1/kanban/columns/{id}",
            put(kanban::update).delete(kanban::delete),
        )
        // Projects
        .route("/api/v1/projects", get(projects::list).post(projects::create))
        .route(
            "/api/v1/projects/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/api/v1/projects/{id}/move", post(projects::move_to_column))
        // Stages
        .route(
            "/api/v1/projects/{id}/stages",
            get(stages::list_by_project).post(stages::create),
        )
        .route(
            "/api/v1/stages/{id}",
            put(stages::update).delete(stages::delete),
        )
        .route("/api/v1/stages/{id}/complete", post(stages::complete))
        // Tasks
        .route("/api/v1/tasks", get(tasks::list).post(tasks::create))
        .route("/api/v1/tasks/{id}", get(tasks::get).put(tasks::update))
        // Chat
        .route("/api/v1/chat/rooms", get(chat::list).post(chat::create))
        .route("/api/v1/chat/rooms/{id}", delete(chat::delete))
        // Logs
        .route("/api/v1/webhooks/{id}/logs", get(logs::webhook_logs))
        .route("/api/v1/system-logs", get(logs::system_logs))
}

pub fn function_routes() -> Router<SharedState> {
    Router::new().route("/functions/v1/webhooks", post(functions::webhooks))
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    /// (limit, offset) with `per_page` clamped to 1..=100.
    pub fn limit_offset(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        (per_page, (page - 1) * per_page)
    }
}
