use serde::{Deserialize, Serialize};
use workbench_tasks::{Task, TaskStatus};

/// Terminal outcome of one task, with nested outcomes for a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskReport {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub status: TaskStatus,
    /// States the task passed through, ending in `status`.
    #[serde(default)]
    pub history: Vec<TaskStatus>,
    pub detail: Option<String>,
    /// Set when a decline stopped a batch before it ran out of subtasks.
    #[serde(default)]
    pub halted: bool,
    #[serde(default)]
    pub subtasks: Vec<TaskReport>,
}

impl TaskReport {
    /// Report for a task that was approved and ran to `status`.
    pub(crate) fn new(task: &Task, status: TaskStatus, detail: Option<String>) -> Self {
        Self::with_history(task, status, &[TaskStatus::Pending, TaskStatus::Running], detail)
    }

    pub(crate) fn skipped(task: &Task) -> Self {
        Self::with_history(
            task,
            TaskStatus::Skipped,
            &[TaskStatus::Pending],
            Some("declined".to_string()),
        )
    }

    fn with_history(
        task: &Task,
        status: TaskStatus,
        before: &[TaskStatus],
        detail: Option<String>,
    ) -> Self {
        let mut history = before.to_vec();
        history.push(status);
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            kind: task.kind.name().to_string(),
            status,
            history,
            detail,
            halted: false,
            subtasks: Vec::new(),
        }
    }

    /// Reports for every leaf below this one, in execution order.
    pub fn leaves(&self) -> Vec<&TaskReport> {
        if self.subtasks.is_empty() {
            return vec![self];
        }
        self.subtasks.iter().flat_map(TaskReport::leaves).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub reports: Vec<TaskReport>,
}

impl RunSummary {
    fn count(&self, status: TaskStatus) -> usize {
        self.reports
            .iter()
            .flat_map(TaskReport::leaves)
            .filter(|r| r.status == status)
            .count()
    }

    pub fn completed(&self) -> usize {
        self.count(TaskStatus::Completed)
    }

    pub fn skipped(&self) -> usize {
        self.count(TaskStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(TaskStatus::Failed)
    }

    pub fn statuses(&self) -> Vec<TaskStatus> {
        self.reports.iter().map(|r| r.status).collect()
    }
}
