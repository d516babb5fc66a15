use crate::config::AnalyzerConfig;
use std::path::Path;
use std::sync::Arc;
use workbench_tasks::{Task, TaskError, TodoList};
use workbench_tools::Workspace;

const HELPER_SOURCE: &str = "export function help(){ return 'help' }";
const INDEX_SOURCE: &str = "import { help } from './helper.js'; console.log(help())";

/// Outcome of reading one well-known file.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    Present,
    /// The read failed. Every failure counts as absence, whatever its cause.
    Absent(String),
}

impl Probe {
    pub fn is_present(&self) -> bool {
        matches!(self, Probe::Present)
    }
}

/// Proposes a todo list from a couple of cheap checks on a workspace.
pub struct WorkspaceAnalyzer {
    workspace: Arc<dyn Workspace>,
    config: AnalyzerConfig,
}

impl WorkspaceAnalyzer {
    pub fn new(workspace: Arc<dyn Workspace>) -> Self {
        Self::with_config(workspace, AnalyzerConfig::default())
    }

    pub fn with_config(workspace: Arc<dyn Workspace>, config: AnalyzerConfig) -> Self {
        Self { workspace, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    async fn probe(&self, path: &Path) -> Probe {
        match self.workspace.read_file(path).await {
            Ok(_) => Probe::Present,
            Err(e) => {
                tracing::debug!("Probe {} treated as absent: {}", path.display(), e);
                Probe::Absent(e.to_string())
            }
        }
    }

    /// Reads the manifest and README, never writes. The returned list is
    /// meant to replace whatever list came before it.
    pub async fn analyze(&self, root: &Path) -> Result<TodoList, TaskError> {
        tracing::info!("Analyzing {}", root.display());

        let manifest = self.probe(&root.join(&self.config.manifest_file)).await;
        let readme = self.probe(&root.join(&self.config.readme_file)).await;

        let mut tasks = Vec::new();
        if manifest.is_present() {
            tasks.push(Task::run_command(
                "install-dependencies",
                format!("Run {}", self.config.install_command),
                root,
                self.config.install_command.clone(),
            ));
        }
        if !readme.is_present() {
            tasks.push(Task::write(
                "add-readme",
                format!("Add {}", self.config.readme_file),
                root.join(&self.config.readme_file),
                self.config.readme_template.clone(),
            ));
        }
        tasks.push(sample_batch(root)?);

        let todos = TodoList::new(tasks)?;
        tracing::info!("Analysis complete. {} tasks created.", todos.len());
        Ok(todos)
    }
}

// Two coordinated writes that show a multi-file edit.
fn sample_batch(root: &Path) -> Result<Task, TaskError> {
    let src = root.join("src");
    Task::batch(
        "multi-edit-sample",
        "Sample multi-file edit",
        vec![
            Task::write(
                "multi-edit-sample/helper",
                "Add src/helper.js",
                src.join("helper.js"),
                HELPER_SOURCE,
            ),
            Task::write(
                "multi-edit-sample/index",
                "Update src/index.js",
                src.join("index.js"),
                INDEX_SOURCE,
            ),
        ],
    )
}
