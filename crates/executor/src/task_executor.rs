use crate::log::ExecutionLog;
use crate::report::{RunSummary, TaskReport};
use async_recursion::async_recursion;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use workbench_interfaces::Confirmation;
use workbench_tasks::{Subtasks, Task, TaskKind, TaskStatus, TodoList};
use workbench_tools::{ToolError, Workspace};

/// Prompt shown before `task` runs. For a batch this is the group prompt,
/// repeated before every subtask.
pub fn confirmation_message(task: &Task) -> String {
    match &task.kind {
        TaskKind::Write { path, .. } => format!("Write file?\n{}", path.display()),
        TaskKind::MakeDirectory { path } => format!("Create folder?\n{}", path.display()),
        TaskKind::Remove { path } => format!("Remove recursively?\n{}", path.display()),
        TaskKind::RunCommand { cwd, cmd } => {
            format!("Run command?\n{}\nCWD: {}", cmd, cwd.display())
        }
        TaskKind::Batch { subtasks } => format!(
            "Execute batch \"{}\" including {} subtasks? (This will prompt per subtask)",
            task.title,
            subtasks.len()
        ),
    }
}

/// Runs tasks one at a time, gating each mutation behind a confirmation.
///
/// Collaborator errors are logged and turned into a `Failed` report; they
/// never stop the run. Nothing executed is rolled back.
pub struct TaskExecutor {
    workspace: Arc<dyn Workspace>,
    confirmation: Arc<dyn Confirmation>,
    log: ExecutionLog,
}

impl TaskExecutor {
    pub fn new(workspace: Arc<dyn Workspace>, confirmation: Arc<dyn Confirmation>) -> Self {
        Self {
            workspace,
            confirmation,
            log: ExecutionLog::new(),
        }
    }

    pub fn log(&self) -> &ExecutionLog {
        &self.log
    }

    /// Runs every top-level task in order. Skipped or failed tasks do not
    /// stop the pass.
    pub async fn run_all(&self, todos: &TodoList) -> RunSummary {
        tracing::info!("Running {} tasks", todos.len());
        let mut reports = Vec::with_capacity(todos.len());
        for task in todos {
            reports.push(self.run_task(task).await);
        }
        RunSummary { reports }
    }

    pub async fn run_by_id(&self, todos: &TodoList, id: &str) -> Option<TaskReport> {
        let task = todos.get(id)?;
        Some(self.run_task(task).await)
    }

    #[async_recursion]
    pub async fn run_task(&self, task: &Task) -> TaskReport {
        tracing::debug!("Task {} {:?}", task.id, TaskStatus::Pending);
        match &task.kind {
            TaskKind::Batch { subtasks } => self.run_batch(task, subtasks).await,
            TaskKind::Write { path, contents } => {
                let label = format!("Write {}", path.display());
                self.run_file_op(task, label, self.workspace.write_file(path, contents)).await
            }
            TaskKind::MakeDirectory { path } => {
                let label = format!("Mkdir {}", path.display());
                self.run_file_op(task, label, self.workspace.make_directory(path)).await
            }
            TaskKind::Remove { path } => {
                let label = format!("Remove {}", path.display());
                self.run_file_op(task, label, self.workspace.remove(path)).await
            }
            TaskKind::RunCommand { cwd, cmd } => self.run_command(task, cwd, cmd).await,
        }
    }

    async fn run_batch(&self, task: &Task, subtasks: &Subtasks) -> TaskReport {
        let prompt = confirmation_message(task);
        let mut reports = Vec::with_capacity(subtasks.len());
        let mut halted = false;

        for sub in subtasks {
            if !self.confirmation.confirm(&prompt).await {
                halted = true;
                break;
            }
            if reports.is_empty() {
                tracing::debug!("Task {} {:?}", task.id, TaskStatus::Running);
            }
            let report = self.run_task(sub).await;
            let declined = report.status == TaskStatus::Skipped;
            reports.push(report);
            if declined {
                halted = true;
                break;
            }
        }

        let ran: Vec<TaskStatus> = reports
            .iter()
            .flat_map(TaskReport::leaves)
            .map(|r| r.status)
            .filter(|s| *s != TaskStatus::Skipped)
            .collect();

        if ran.is_empty() {
            self.log.push(format!("Batch \"{}\": skipped", task.title));
            let mut report = TaskReport::skipped(task);
            report.halted = halted;
            report.subtasks = reports;
            return report;
        }

        let status = if ran.contains(&TaskStatus::Failed) {
            TaskStatus::Failed
        } else {
            TaskStatus::Completed
        };
        let detail = format!("{}/{} subtasks run", reports.len(), subtasks.len());
        self.log.push(format!(
            "Batch \"{}\": {}{}",
            task.title,
            detail,
            if halted { " (stopped)" } else { "" }
        ));

        let mut report = TaskReport::new(task, status, Some(detail));
        report.halted = halted;
        report.subtasks = reports;
        report
    }

    /// Asks before a leaf runs. Logs the `Running` transition on approval.
    async fn approve(&self, task: &Task) -> bool {
        if !self.confirmation.confirm(&confirmation_message(task)).await {
            tracing::debug!("Task {} declined", task.id);
            return false;
        }
        tracing::debug!("Task {} {:?}", task.id, TaskStatus::Running);
        true
    }

    // `op` is not polled until the task is approved.
    async fn run_file_op(
        &self,
        task: &Task,
        label: String,
        op: impl Future<Output = Result<(), ToolError>> + Send,
    ) -> TaskReport {
        if !self.approve(task).await {
            return TaskReport::skipped(task);
        }
        match op.await {
            Ok(()) => {
                self.log.push(format!("{}: ok", label));
                TaskReport::new(task, TaskStatus::Completed, None)
            }
            Err(e) => {
                self.log.push(format!("{}: {}", label, e));
                TaskReport::new(task, TaskStatus::Failed, Some(e.to_string()))
            }
        }
    }

    async fn run_command(&self, task: &Task, cwd: &Path, cmd: &str) -> TaskReport {
        if !self.approve(task).await {
            return TaskReport::skipped(task);
        }

        self.log.push(format!("> Running: {}", cmd));
        match self.workspace.run_command(cwd, cmd).await {
            Ok(output) => {
                let text = format!("{}{}", output.stdout, output.stderr);
                if !text.is_empty() {
                    self.log.push(text.trim_end().to_string());
                }
                if output.success() {
                    TaskReport::new(task, TaskStatus::Completed, None)
                } else {
                    let detail = match output.exit_code {
                        Some(code) => format!("exit status {}", code),
                        None => "terminated by signal".to_string(),
                    };
                    self.log.push(format!("ERROR: {}", detail));
                    TaskReport::new(task, TaskStatus::Failed, Some(detail))
                }
            }
            Err(e) => {
                self.log.push(format!("ERROR: {}", e));
                TaskReport::new(task, TaskStatus::Failed, Some(e.to_string()))
            }
        }
    }
}
