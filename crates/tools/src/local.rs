use crate::file_tools;
use crate::process_tools;
use crate::traits::{CommandOutput, ToolError, Workspace};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// [`Workspace`] backed by the local filesystem and shell.
#[derive(Debug, Clone, Default)]
pub struct LocalWorkspace {
    command_timeout: Option<Duration>,
}

impl LocalWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Workspace for LocalWorkspace {
    async fn read_file(&self, path: &Path) -> Result<String, ToolError> {
        file_tools::read_file(path).await
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), ToolError> {
        file_tools::write_file(path, contents).await
    }

    async fn make_directory(&self, path: &Path) -> Result<(), ToolError> {
        file_tools::make_directory(path).await
    }

    async fn remove(&self, path: &Path) -> Result<(), ToolError> {
        file_tools::remove(path).await
    }

    async fn run_command(&self, cwd: &Path, cmd: &str) -> Result<CommandOutput, ToolError> {
        process_tools::run_shell(cwd, cmd, self.command_timeout).await
    }
}
