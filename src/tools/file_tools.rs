use anyhow::{Context, Result};
use log::debug;
use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::Path;

/// 複製檔案並在回報成功前強制寫入磁碟
pub fn copy_file_synced(source: &Path, target: &Path) -> Result<()> {
    let mut reader =
        File::open(source).with_context(|| format!("failed to open {}", source.display()))?;
    let mut writer =
        File::create(target).with_context(|| format!("failed to create {}", target.display()))?;

    io::copy(&mut reader, &mut writer).with_context(|| {
        format!("failed to copy {} -> {}", source.display(), target.display())
    })?;
    writer
        .sync_all()
        .with_context(|| format!("failed to sync {}", target.display()))?;

    Ok(())
}

/// 移動檔案
///
/// 跨檔案系統時 rename 會失敗，改為複製後刪除原檔
pub fn move_file(source: &Path, target: &Path) -> Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(
                "rename across devices, copying instead: {} -> {}",
                source.display(),
                target.display()
            );
            copy_file_synced(source, target)?;
            fs::remove_file(source)
                .with_context(|| format!("failed to remove source {}", source.display()))
        }
        Err(e) => Err(e).with_context(|| {
            format!("failed to move {} -> {}", source.display(), target.display())
        }),
    }
}
