use crate::traits::ToolError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

pub async fn read_file(path: &Path) -> Result<String, ToolError> {
    Ok(fs::read_to_string(path).await?)
}

/// Writes through a uniquely named temp file in the same directory and
/// renames it into place. No other path is touched.
pub async fn write_file(path: &Path, contents: &str) -> Result<(), ToolError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).await?;

    let target = path.to_path_buf();
    let bytes = contents.as_bytes().to_vec();
    tokio::task::spawn_blocking(move || persist_atomically(&parent, &target, &bytes))
        .await
        .map_err(|e| ToolError::ExecutionFailed(format!("write task failed: {}", e)))??;

    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn persist_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;

    // Temp files are created owner-only; keep the mode a plain write would give.
    match std::fs::metadata(target) {
        Ok(existing) => file.as_file().set_permissions(existing.permissions())?,
        Err(_) => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                file.as_file()
                    .set_permissions(std::fs::Permissions::from_mode(0o644))?;
            }
        }
    }

    file.persist(target)?;
    Ok(())
}

pub async fn make_directory(path: &Path) -> Result<(), ToolError> {
    fs::create_dir_all(path).await?;
    Ok(())
}

/// Removes a file, or a directory with everything below it.
pub async fn remove(path: &Path) -> Result<(), ToolError> {
    let metadata = fs::symlink_metadata(path).await?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).await?;
    } else {
        fs::remove_file(path).await?;
    }
    Ok(())
}
