use serde::Serialize;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::middleware::system_log::{self, Level};
use crate::models::{KanbanColumn, Project, ProjectStage, StageStatus};
use crate::webhooks::{payload, publish};

use super::plan::{self, BoardPlan};
use super::task_mirror::{self, MirrorOutcome};

/// Project state after a board change has been committed.
#[derive(Debug, Clone, Serialize)]
pub struct BoardOutcome {
    pub project: Project,
    pub kanban_column: Option<KanbanColumn>,
    pub stages: Vec<ProjectStage>,
    pub stages_changed: usize,
}

/// Move a project to a kanban column and propagate the move to its stages.
///
/// Moving to a completion column fails with a conflict while any stage is
/// incomplete; nothing is written in that case. Stage and project writes
/// share one transaction; the task mirror and webhook run after commit.
pub async fn move_project_to_column(
    pool: &PgPool,
    project_id: Uuid,
    column_id: Uuid,
) -> Result<BoardOutcome, AppError> {
    let mut tx = pool.begin().await?;

    db::projects::find_for_update(&mut *tx, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let columns = db::kanban_columns::list_in(&mut *tx).await?;
    let stages = db::stages::list_by_project_in(&mut *tx, project_id).await?;

    let plan = plan::plan_move(&columns, &stages, column_id)?;
    let outcome = apply(&mut *tx, project_id, &plan, columns).await?;

    tx.commit().await?;

    tracing::info!(
        "Project {project_id} moved to column {column_id} ({} stage(s) updated)",
        outcome.stages_changed
    );

    after_board_change(pool, &outcome).await;
    Ok(outcome)
}

/// Mark one stage complete or incomplete, then recompute the column of its project.
pub async fn set_stage_completed(
    pool: &PgPool,
    stage_id: Uuid,
    completed: bool,
) -> Result<BoardOutcome, AppError> {
    let stage = db::stages::find_by_id(pool, stage_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stage not found".to_string()))?;

    let mut tx = pool.begin().await?;

    let project = db::projects::find_for_update(&mut *tx, stage.project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let status = if completed {
        StageStatus::Completed
    } else {
        StageStatus::Pending
    };
    db::stages::set_progress(&mut *tx, stage.id, completed, status.as_str()).await?;

    let columns = db::kanban_columns::list_in(&mut *tx).await?;
    let stages = db::stages::list_by_project_in(&mut *tx, project.id).await?;

    let outcome = match plan::plan_reconcile(&columns, &stages, project.kanban_column_id) {
        Some(plan) => apply(&mut *tx, project.id, &plan, columns).await?,
        None => {
            let kanban_column = project
                .kanban_column_id
                .and_then(|id| columns.into_iter().find(|c| c.id == id));
            BoardOutcome {
                project,
                kanban_column,
                stages,
                stages_changed: 0,
            }
        }
    };

    tx.commit().await?;

    tracing::info!(
        "Stage {stage_id} marked {}; project {} now in status '{}'",
        if completed { "complete" } else { "incomplete" },
        outcome.project.id,
        outcome.project.status
    );

    after_board_change(pool, &outcome).await;
    Ok(outcome)
}

/// Re-place a project that is already on the board after its stage set changed
/// (a stage was added or removed). Projects without a column are left alone.
/// Returns `None` when nothing moved.
pub async fn reconcile_project(
    pool: &PgPool,
    project_id: Uuid,
) -> Result<Option<BoardOutcome>, AppError> {
    let mut tx = pool.begin().await?;

    let Some(project) = db::projects::find_for_update(&mut *tx, project_id).await? else {
        return Ok(None);
    };
    if project.kanban_column_id.is_none() {
        return Ok(None);
    }

    let columns = db::kanban_columns::list_in(&mut *tx).await?;
    let stages = db::stages::list_by_project_in(&mut *tx, project.id).await?;

    let Some(plan) = plan::plan_reconcile(&columns, &stages, project.kanban_column_id) else {
        return Ok(None);
    };
    if Some(plan.column_id) == project.kanban_column_id
        && plan.project_status.as_str() == project.status
    {
        return Ok(None);
    }

    let outcome = apply(&mut *tx, project.id, &plan, columns).await?;
    tx.commit().await?;

    tracing::info!(
        "Project {project_id} re-placed after stage change; now in status '{}'",
        outcome.project.status
    );

    after_board_change(pool, &outcome).await;
    Ok(Some(outcome))
}

async fn apply(
    conn: &mut PgConnection,
    project_id: Uuid,
    plan: &BoardPlan,
    columns: Vec<KanbanColumn>,
) -> Result<BoardOutcome, sqlx::Error> {
    for change in &plan.stage_changes {
        db::stages::set_progress(
            &mut *conn,
            change.stage_id,
            change.completed,
            change.status.as_str(),
        )
        .await?;
    }

    let project = db::projects::set_board_position(
        &mut *conn,
        project_id,
        Some(plan.column_id),
        plan.project_status.as_str(),
    )
    .await?;

    let stages = db::stages::list_by_project_in(&mut *conn, project_id).await?;
    let kanban_column = columns.into_iter().find(|c| c.id == plan.column_id);

    Ok(BoardOutcome {
        project,
        kanban_column,
        stages,
        stages_changed: plan.stage_changes.len(),
    })
}

/// Best-effort follow-ups once the board change is committed.
async fn after_board_change(pool: &PgPool, outcome: &BoardOutcome) {
    let project = &outcome.project;

    match task_mirror::mirror(pool, project, &outcome.stages).await {
        Ok(MirrorOutcome::Ambiguous(count)) => {
            system_log::record(
                pool,
                Level::Warn,
                "kanban_sync",
                "Task mirror skipped: several tasks match the project",
                Some(json!({
                    "project_id": project.id,
                    "title": task_mirror::legacy_title(&project.name),
                    "matches": count,
                })),
            )
            .await;
        }
        Ok(MirrorOutcome::Updated(task_id)) => {
            tracing::debug!("Task {task_id} mirrored from project {}", project.id);
        }
        Ok(MirrorOutcome::Unchanged(_) | MirrorOutcome::NoTask) => {}
        Err(e) => {
            system_log::record(
                pool,
                Level::Error,
                "kanban_sync",
                &format!("Task mirror failed: {e}"),
                Some(json!({ "project_id": project.id })),
            )
            .await;
        }
    }

    if let Err(e) = publish::enqueue_consolidated(
        pool,
        payload::PROJECT_STATUS_CHANGED,
        project,
        outcome.kanban_column.as_ref(),
        &outcome.stages,
    )
    .await
    {
        system_log::record(
            pool,
            Level::Error,
            "kanban_sync",
            &format!("Failed to queue status webhook: {e}"),
            Some(json!({ "project_id": project.id })),
        )
        .await;
    }
}
