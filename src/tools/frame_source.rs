//! 取得 DV 檔每個 frame 的資訊
//!
//! 優先順序：`<檔名>.frames.json` → `<檔名>.dvrescue.xml` → 執行 dvrescue 產生 XML

use super::dvrescue_runner::{dvrescue_xml_path, run_dvrescue};
use super::dvrescue_xml::read_dvrescue_xml;
use super::frame_json::{frame_json_path, read_frame_json};
use crate::component::segment_packager::FrameRecord;
use anyhow::Result;
use log::info;
use std::path::Path;

pub fn load_frames(source: &Path) -> Result<Vec<FrameRecord>> {
    let json_path = frame_json_path(source);
    if json_path.exists() {
        info!("使用 frame 列表: {}", json_path.display());
        return read_frame_json(&json_path);
    }

    let xml_path = dvrescue_xml_path(source);
    if xml_path.exists() {
        info!("使用既有的 dvrescue XML: {}", xml_path.display());
    } else {
        run_dvrescue(source, &xml_path)?;
    }
    read_dvrescue_xml(&xml_path)
}
