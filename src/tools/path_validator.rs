use anyhow::{Context, Result};
use std::path::Path;

/// 建立資料夾（含上層），已存在時不做任何事
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("failed to create dir {}", path.display()))?;
    }
    Ok(())
}
