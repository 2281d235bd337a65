use uuid::Uuid;

use crate::models::{KanbanColumn, ProjectStage, ProjectStatus, StageStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct StageChange {
    pub stage_id: Uuid,
    pub completed: bool,
    pub status: StageStatus,
}

/// Writes needed to put a project on a kanban column.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardPlan {
    pub column_id: Uuid,
    pub project_status: ProjectStatus,
    pub stage_changes: Vec<StageChange>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropagationError {
    IncompleteStages { remaining: usize },
    ColumnNotFound(Uuid),
}

impl std::fmt::Display for PropagationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropagationError::IncompleteStages { remaining } => write!(
                f,
                "Cannot complete project: {remaining} stage(s) still incomplete"
            ),
            PropagationError::ColumnNotFound(id) => write!(f, "Kanban column {id} not found"),
        }
    }
}

impl std::error::Error for PropagationError {}

/// Non-terminal columns in board order. `columns` must already be sorted by position.
pub fn workflow_columns(columns: &[KanbanColumn]) -> Vec<&KanbanColumn> {
    columns.iter().filter(|c| !c.is_terminal()).collect()
}

/// Plan the stage and project updates for moving a project onto `destination_id`.
///
/// `columns` and `stages` must be in board and stage order respectively.
/// Only stages whose stored state differs from the target appear in the plan.
pub fn plan_move(
    columns: &[KanbanColumn],
    stages: &[ProjectStage],
    destination_id: Uuid,
) -> Result<BoardPlan, PropagationError> {
    let destination = columns
        .iter()
        .find(|c| c.id == destination_id)
        .ok_or(PropagationError::ColumnNotFound(destination_id))?;

    if destination.is_completion {
        let remaining = stages.iter().filter(|s| !s.completed).count();
        if remaining > 0 {
            return Err(PropagationError::IncompleteStages { remaining });
        }
        return Ok(BoardPlan {
            column_id: destination.id,
            project_status: ProjectStatus::Completed,
            stage_changes: changes_for(stages.iter(), true, StageStatus::Completed),
        });
    }

    if destination.is_cancellation {
        return Ok(BoardPlan {
            column_id: destination.id,
            project_status: ProjectStatus::Cancelled,
            stage_changes: changes_for(
                stages.iter().filter(|s| !s.completed),
                false,
                StageStatus::Cancelled,
            ),
        });
    }

    let index = workflow_columns(columns)
        .iter()
        .position(|c| c.id == destination.id)
        .unwrap_or(0);

    let project_status = if index > 0 {
        ProjectStatus::InProgress
    } else {
        ProjectStatus::Planned
    };

    let done = index.min(stages.len());
    Ok(BoardPlan {
        column_id: destination.id,
        project_status,
        stage_changes: changes_for(stages[..done].iter(), true, StageStatus::Completed),
    })
}

/// Work out which column a project belongs in from its stage completion.
/// Returns `None` when the project should stay where it is.
pub fn plan_reconcile(
    columns: &[KanbanColumn],
    stages: &[ProjectStage],
    current_column_id: Option<Uuid>,
) -> Option<BoardPlan> {
    let current = current_column_id.and_then(|id| columns.iter().find(|c| c.id == id));
    if current.is_some_and(|c| c.is_cancellation) {
        return None;
    }

    let completed = stages.iter().filter(|s| s.completed).count();

    if !stages.is_empty() && completed == stages.len() {
        if let Some(done) = columns.iter().find(|c| c.is_completion) {
            return Some(BoardPlan {
                column_id: done.id,
                project_status: ProjectStatus::Completed,
                stage_changes: Vec::new(),
            });
        }
    }

    let workflow = workflow_columns(columns);
    let last = workflow.len().checked_sub(1)?;
    let column = workflow[completed.min(last)];

    Some(BoardPlan {
        column_id: column.id,
        project_status: if completed > 0 {
            ProjectStatus::InProgress
        } else {
            ProjectStatus::Planned
        },
        stage_changes: Vec::new(),
    })
}

fn changes_for<'a>(
    stages: impl Iterator<Item = &'a ProjectStage>,
    completed: bool,
    status: StageStatus,
) -> Vec<StageChange> {
    stages
        .filter(|s| s.completed != completed || s.status != status.as_str())
        .map(|s| StageChange {
            stage_id: s.id,
            completed,
            status,
        })
        .collect()
}
