use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Failure reported by a filesystem or process call.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
    #[error("Command timed out after {0}s")]
    Timeout(u64),
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        ToolError::Io(e.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Filesystem and process operations the task engine needs from its host.
#[async_trait]
pub trait Workspace: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<String, ToolError>;
    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), ToolError>;
    async fn make_directory(&self, path: &Path) -> Result<(), ToolError>;
    async fn remove(&self, path: &Path) -> Result<(), ToolError>;
    async fn run_command(&self, cwd: &Path, cmd: &str) -> Result<CommandOutput, ToolError>;
}
