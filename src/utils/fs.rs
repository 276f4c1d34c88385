use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use crate::utils::{OptimizerError, OptimizerResult};

/// Create the parent directory of `path` if it is missing
pub async fn ensure_parent_dir(path: impl AsRef<Path>) -> OptimizerResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| OptimizerError::io(format!(
                    "Failed to create directory {}: {}", parent.display(), e
                )))?;
        }
    }
    Ok(())
}

/// Sibling path used while a file is being written
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("report"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path`, replacing any existing file.
///
/// Data goes to a temporary sibling first and is renamed into place, so
/// readers never observe a half-written file.
pub async fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> OptimizerResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path).await?;

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, contents).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(OptimizerError::io(format!(
            "Failed to write {}: {}", tmp.display(), e
        )));
    }

    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(OptimizerError::io(format!(
            "Failed to move report into place at {}: {}", path.display(), e
        )));
    }
    Ok(())
}
