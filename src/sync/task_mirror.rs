use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::models::{Project, ProjectStage, ProjectStatus, TaskStatus};

const LEGACY_TITLE_PREFIX: &str = "Projeto: ";

#[derive(Debug, Clone, PartialEq)]
pub enum MirrorOutcome {
    Updated(Uuid),
    Unchanged(Uuid),
    NoTask,
    /// Several tasks are linked to the project, or carry its legacy title.
    /// None was touched.
    Ambiguous(usize),
}

/// Title that links a task to a project when the task has no `project_id`.
pub fn legacy_title(project_name: &str) -> String {
    format!("{LEGACY_TITLE_PREFIX}{project_name}")
}

pub fn task_status_for(project_status: &str) -> TaskStatus {
    match ProjectStatus::parse(project_status) {
        Some(ProjectStatus::Completed) => TaskStatus::Done,
        Some(ProjectStatus::Cancelled) => TaskStatus::Cancelled,
        Some(ProjectStatus::InProgress) => TaskStatus::InProgress,
        Some(ProjectStatus::Planned) | None => TaskStatus::Todo,
    }
}

/// Set `done` on checklist items whose title names a stage. Other items and
/// unknown fields are kept as they are. Returns `None` when nothing changed.
pub fn mirror_checklist(checklist: &Value, stages: &[ProjectStage]) -> Option<Value> {
    let items = checklist.as_array()?;
    let mut changed = false;

    let mirrored = items
        .iter()
        .map(|item| {
            let title = item.get("title").and_then(Value::as_str);
            let stage = title.and_then(|t| stages.iter().find(|s| s.name == t));
            match (stage, item.as_object()) {
                (Some(stage), Some(obj)) if obj.get("done") != Some(&Value::Bool(stage.completed)) => {
                    changed = true;
                    let mut obj = obj.clone();
                    obj.insert("done".to_string(), Value::Bool(stage.completed));
                    Value::Object(obj)
                }
                _ => item.clone(),
            }
        })
        .collect::<Vec<_>>();

    changed.then_some(Value::Array(mirrored))
}

/// Reflect the project's state onto its task. Prefers the task linked by
/// `project_id`; falls back to an exact legacy-title match. Either lookup
/// must find exactly one task.
pub async fn mirror(
    pool: &PgPool,
    project: &Project,
    stages: &[ProjectStage],
) -> Result<MirrorOutcome, sqlx::Error> {
    let mut tasks = db::tasks::list_by_project(pool, project.id).await?;
    if tasks.is_empty() {
        tasks = db::tasks::list_by_title(pool, &legacy_title(&project.name)).await?;
    }
    if tasks.len() > 1 {
        return Ok(MirrorOutcome::Ambiguous(tasks.len()));
    }

    let Some(task) = tasks.into_iter().next() else {
        return Ok(MirrorOutcome::NoTask);
    };

    let status = task_status_for(&project.status);
    let checklist = mirror_checklist(&task.checklist, stages);

    if checklist.is_none() && task.status == status.as_str() {
        return Ok(MirrorOutcome::Unchanged(task.id));
    }

    let checklist = checklist.unwrap_or(task.checklist);
    db::tasks::set_progress(pool, task.id, status.as_str(), &checklist).await?;
    Ok(MirrorOutcome::Updated(task.id))
}
