use super::path_tools::sidecar_path;
use crate::component::segment_packager::FrameRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// JSON frame 列表的檔案後綴
pub const FRAME_JSON_SUFFIX: &str = ".frames.json";

#[must_use]
pub fn frame_json_path(source: &Path) -> PathBuf {
    sidecar_path(source, FRAME_JSON_SUFFIX)
}

/// 讀取 JSON 格式的 frame 列表（依串流順序的陣列）
pub fn read_frame_json(path: &Path) -> Result<Vec<FrameRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("無法讀取 frame 列表: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("無法解析 frame 列表: {}", path.display()))
}
