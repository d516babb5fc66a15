use std::path::Path;
use std::sync::Arc;
use workbench_analyzer::{AnalyzerConfig, WorkspaceAnalyzer};
use workbench_executor::{ExecutionLog, RunSummary, TaskExecutor, TaskReport};
use workbench_interfaces::Confirmation;
use workbench_tasks::{TaskError, TodoList};
use workbench_tools::Workspace;

/// Owns the active todo list: analysis replaces it, execution reads it.
pub struct AgentPanel {
    analyzer: WorkspaceAnalyzer,
    executor: TaskExecutor,
    todos: TodoList,
}

impl AgentPanel {
    pub fn new(
        workspace: Arc<dyn Workspace>,
        confirmation: Arc<dyn Confirmation>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            analyzer: WorkspaceAnalyzer::with_config(workspace.clone(), config),
            executor: TaskExecutor::new(workspace, confirmation),
            todos: TodoList::default(),
        }
    }

    pub async fn analyze(&mut self, root: &Path) -> Result<usize, TaskError> {
        self.log().push(format!("Analyzing {}...", root.display()));
        let todos = self.analyzer.analyze(root).await?;
        self.replace(todos);
        self.log()
            .push(format!("Analysis complete. {} tasks created.", self.todos.len()));
        Ok(self.todos.len())
    }

    /// Swaps in a list built elsewhere, e.g. loaded from a plan file.
    pub fn replace(&mut self, todos: TodoList) {
        self.todos = todos;
    }

    pub fn todos(&self) -> &TodoList {
        &self.todos
    }

    pub fn log(&self) -> &ExecutionLog {
        self.executor.log()
    }

    pub async fn run_task(&self, id: &str) -> Option<TaskReport> {
        self.executor.run_by_id(&self.todos, id).await
    }

    pub async fn run_all(&self) -> RunSummary {
        if self.todos.is_empty() {
            return RunSummary::default();
        }
        self.executor.run_all(&self.todos).await
    }

    pub fn open_target(&self, id: &str) -> Option<&Path> {
        self.todos.get(id)?.open_target()
    }

    pub fn describe(&self) -> Vec<String> {
        self.todos
            .iter()
            .map(|task| format!("{}  {}", task, task.describe()))
            .collect()
    }
}
