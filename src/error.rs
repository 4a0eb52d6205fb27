//! 錯誤分類
//!
//! 規劃階段錯誤會中止整個來源；擷取階段錯誤只影響單一片段。

use std::path::PathBuf;
use thiserror::Error;

/// 規劃階段錯誤（整份規劃作廢）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("第 {frame} 個 frame 缺少必要欄位 `{field}`")]
    MalformedInput { frame: usize, field: &'static str },
}

/// 設定錯誤（開始規劃前即失敗）
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("無法讀取設定檔 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("無法辨識的設定 {path}: {source}")]
    Unrecognized {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("max_parallel_jobs 必須大於 0")]
    NoParallelJobs,
    #[error("extraction_retries 為 {retries}，最多 {max}")]
    TooManyRetries { retries: u32, max: u32 },
    #[error("忽略技術參數變化時無法輸出 MOV（MOV 不支援串流中途改變參數），請改用 MKV")]
    IgnoreChangesWithMov,
}

/// 單一片段擷取失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("片段 {ordinal} 擷取失敗: {message}")]
pub struct ExtractionFailure {
    pub ordinal: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_message_names_frame_and_field() {
        let err = PlanError::MalformedInput {
            frame: 7,
            field: "pts",
        };
        let text = err.to_string();
        assert!(text.contains('7'));
        assert!(text.contains("pts"));
    }

    #[test]
    fn test_extraction_failure_message() {
        let failure = ExtractionFailure {
            ordinal: 3,
            message: "ffmpeg exited with 1".to_string(),
        };
        assert!(failure.to_string().contains("ffmpeg exited with 1"));
    }
}
