use chrono::Utc;
use serde_json::{Value, json};

use crate::models::{KanbanColumn, Project, ProjectStage};

pub const PROJECT_CONSOLIDATED: &str = "project.consolidated";
pub const PROJECT_STATUS_CHANGED: &str = "project.status_changed";
pub const WEBHOOK_TEST: &str = "webhook.test";

/// One payload describing a project as a whole: the row, its column, every
/// stage, and progress figures derived from the stages.
pub fn consolidated(
    event: &str,
    project: &Project,
    column: Option<&KanbanColumn>,
    stages: &[ProjectStage],
) -> Value {
    let total_stages = stages.len();
    let completed_stages = stages.iter().filter(|s| s.completed).count();
    let progress_percent = if total_stages == 0 {
        0
    } else {
        completed_stages * 100 / total_stages
    };
    let stages_value: f64 = stages.iter().map(|s| s.value).sum();

    json!({
        "event": event,
        "generated_at": Utc::now(),
        "project": project,
        "kanban_column": column,
        "stages": stages,
        "summary": {
            "total_stages": total_stages,
            "completed_stages": completed_stages,
            "progress_percent": progress_percent,
            "stages_value": stages_value,
            "total_value": project.total_value,
        },
    })
}

pub fn test_payload(webhook_name: &str) -> Value {
    json!({
        "event": WEBHOOK_TEST,
        "generated_at": Utc::now(),
        "message": format!("Test delivery for webhook '{webhook_name}'"),
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn project() -> Project {
        Project {
            id: Uuid::now_v7(),
            name: "Acme ERP".to_string(),
            description: None,
            client_name: Some("Acme".to_string()),
            status: "in_progress".to_string(),
            kanban_column_id: None,
            total_value: 1000.0,
            start_date: None,
            end_date: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stage(value: f64, completed: bool) -> ProjectStage {
        ProjectStage {
            id: Uuid::now_v7(),
            project_id: Uuid::nil(),
            name: "stage".to_string(),
            position: 0,
            start_date: None,
            end_date: None,
            value,
            completed,
            status: "pending".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn summary_counts_progress_and_value() {
        let stages = vec![stage(250.0, true), stage(250.0, false), stage(100.0, false)];
        let body = consolidated(PROJECT_CONSOLIDATED, &project(), None, &stages);

        assert_eq!(body["event"], PROJECT_CONSOLIDATED);
        assert_eq!(body["project"]["name"], "Acme ERP");
        assert!(body["kanban_column"].is_null());
        assert_eq!(body["stages"].as_array().unwrap().len(), 3);
        assert_eq!(body["summary"]["completed_stages"], 1);
        assert_eq!(body["summary"]["progress_percent"], 33);
        assert_eq!(body["summary"]["stages_value"], 600.0);
        assert_eq!(body["summary"]["total_value"], 1000.0);
    }

    #[test]
    fn project_without_stages_reports_zero_progress() {
        let body = consolidated(PROJECT_CONSOLIDATED, &project(), None, &[]);
        assert_eq!(body["summary"]["progress_percent"], 0);
        assert_eq!(body["summary"]["total_stages"], 0);
    }
}
