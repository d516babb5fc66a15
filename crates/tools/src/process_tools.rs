use crate::traits::{CommandOutput, ToolError};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

fn shell_command(cmd: &str) -> Command {
    #[cfg(windows)]
    {
        let mut command = Command::new("cmd");
        command.args(["/C", cmd]);
        command
    }
    #[cfg(not(windows))]
    {
        let mut command = Command::new("sh");
        command.args(["-c", cmd]);
        command
    }
}

/// Runs `cmd` through the platform shell inside `cwd`.
///
/// A non-zero exit status is not an error here; callers inspect
/// [`CommandOutput::exit_code`].
pub async fn run_shell(
    cwd: &Path,
    cmd: &str,
    limit: Option<Duration>,
) -> Result<CommandOutput, ToolError> {
    tracing::info!("Executing command: {} (cwd: {})", cmd, cwd.display());

    let mut command = shell_command(cmd);
    command
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match limit {
        Some(limit) => tokio::time::timeout(limit, command.output())
            .await
            .map_err(|_| ToolError::Timeout(limit.as_secs()))?,
        None => command.output().await,
    }
    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
    })
}
