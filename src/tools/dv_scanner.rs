use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// DV 原始檔副檔名
const DV_EXTENSIONS: [&str; 2] = ["dv", "dif"];

#[must_use]
pub fn is_dv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DV_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// 掃描目錄下所有 DV 檔，依路徑排序
pub fn scan_dv_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_dv_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.sort();
    Ok(files)
}
