use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub id: Uuid,
    pub title: String,
    pub position: i32,
    pub color: Option<String>,
    pub is_completion: bool,
    pub is_cancellation: bool,
    pub created_at: DateTime<Utc>,
}

impl KanbanColumn {
    /// Completion and cancellation columns end a project's workflow.
    pub fn is_terminal(&self) -> bool {
        self.is_completion || self.is_cancellation
    }
}
