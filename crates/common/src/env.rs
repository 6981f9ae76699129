//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage location is usable at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the parent directory of the data file exists, creating it if needed.
pub async fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    let Some(dir) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(dir).await.is_err() {
        warn!(dir = %dir.display(), "data directory not found; creating it");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    info!(dir = %dir.display(), "data directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent_dirs() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("msg_env_{}", uuid::Uuid::new_v4()));
        let file = root.join("nested").join("messages.json");
        ensure_data_dir(&file).await?;
        assert!(tokio::fs::metadata(root.join("nested")).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_needs_no_dir() -> anyhow::Result<()> {
        ensure_data_dir(Path::new("messages.json")).await
    }
}
