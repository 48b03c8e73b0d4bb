//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before the listener is bound.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding the data file exists.
///
/// A missing file is fine (the store starts empty), but a missing parent
/// directory would turn every save into an I/O error.
pub async fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    let Some(dir) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(dir).await.is_ok() {
        return Ok(());
    }
    warn!(dir = %dir.display(), "data directory missing; creating it");
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    info!(dir = %dir.display(), "data directory created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("ensure_env_{}", uuid::Uuid::new_v4()));
        let file = root.join("nested").join("data.json");
        ensure_data_dir(&file).await?;
        assert!(tokio::fs::metadata(root.join("nested")).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_needs_no_dir() -> anyhow::Result<()> {
        ensure_data_dir(Path::new("data.json")).await?;
        Ok(())
    }
}
