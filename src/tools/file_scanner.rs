use log::{info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 系統保留資料夾，不進入掃描
pub const SYSTEM_FOLDERS: [&str; 3] = [".DocumentRevisions-V100", ".Spotlight-V100", ".fseventsd"];

#[derive(Debug, Default)]
pub struct CollectedFiles {
    pub paths: Vec<PathBuf>,
    pub total: usize,
}

fn is_system_folder(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SYSTEM_FOLDERS.contains(&name))
}

/// 掃描輸入資料夾，收集所有一般檔案
///
/// 權限不足的子目錄與其他單一項目錯誤只記錄，不會中斷掃描
pub fn collect_files(root: &Path) -> CollectedFiles {
    let mut collected = CollectedFiles::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if is_system_folder(entry) {
                info!("Skipping system folder: {}", entry.path().display());
                return false;
            }
            true
        });

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    collected.paths.push(entry.into_path());
                    collected.total += 1;
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                if e.io_error().map(std::io::Error::kind) == Some(ErrorKind::PermissionDenied) {
                    warn!("Skipping directory due to permission error: {path}");
                } else {
                    warn!("Ignoring walk error for {path}: {e}");
                }
            }
        }
    }

    collected
}
