//! 平行擷取片段
//!
//! 各片段互不相依，使用 rayon 平行呼叫 ffmpeg。單一片段失敗只記錄在該片段的
//! 結果中，不影響其他片段。輸出先寫入暫存檔，成功後才改名為正式檔名。
//! 已存在的輸出檔不會被覆寫。

use super::ffmpeg_command::ExtractionRequest;
use crate::config::PackagerSettings;
use crate::error::ExtractionFailure;
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// 外部轉檔程式
pub trait Transcoder: Sync {
    fn transcode(&self, request: &ExtractionRequest, destination: &Path) -> Result<()>;
}

/// 以 ffmpeg 進行擷取
pub struct FfmpegTranscoder;

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, request: &ExtractionRequest, destination: &Path) -> Result<()> {
        let output = request
            .build_command(destination)
            .output()
            .with_context(|| format!("無法執行 ffmpeg: {}", request.source_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffmpeg 執行失敗: {}", stderr.trim());
        }

        if !destination.exists() {
            bail!("輸出檔案未建立: {}", destination.display());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    Completed,
    Failed(ExtractionFailure),
    Cancelled,
    /// 輸出檔已存在，或與同批次的其他片段同名
    Skipped,
}

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub ordinal: usize,
    pub output_path: PathBuf,
    pub attempts: u32,
    pub status: ExtractionStatus,
}

/// 擷取結果統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub skipped: usize,
}

impl ExtractionSummary {
    #[must_use]
    pub fn from_outcomes(outcomes: &[ExtractionOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome.status {
                    ExtractionStatus::Completed => summary.succeeded += 1,
                    ExtractionStatus::Failed(_) => summary.failed += 1,
                    ExtractionStatus::Cancelled => summary.cancelled += 1,
                    ExtractionStatus::Skipped => summary.skipped += 1,
                }
                summary
            })
    }
}

fn temporary_path(output_path: &Path) -> PathBuf {
    let file_name = output_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("segment");
    let parent = output_path.parent().unwrap_or(Path::new("."));
    parent.join(format!(".{file_name}.{}.partial", Uuid::new_v4()))
}

fn discard(path: &Path) {
    if path.exists()
        && let Err(e) = fs::remove_file(path)
    {
        warn!("無法刪除暫存檔 {}: {}", path.display(), e);
    }
}

fn attempt<T: Transcoder>(transcoder: &T, request: &ExtractionRequest) -> Result<()> {
    let temp_path = temporary_path(&request.output_path);
    debug!(
        "擷取片段 {}: {} -> {}",
        request.ordinal,
        request.source_path.display(),
        temp_path.display()
    );

    let result = transcoder.transcode(request, &temp_path).and_then(|()| {
        if request.output_path.exists() {
            bail!("輸出檔案已存在: {}", request.output_path.display());
        }
        fs::rename(&temp_path, &request.output_path).with_context(|| {
            format!(
                "無法將暫存檔改名為 {}",
                request.output_path.display()
            )
        })
    });

    if result.is_err() {
        discard(&temp_path);
    }
    result
}

/// 擷取單一片段，失敗時依設定重試
pub fn extract_segment<T: Transcoder>(
    transcoder: &T,
    request: &ExtractionRequest,
    retries: u32,
    shutdown_signal: &AtomicBool,
) -> ExtractionOutcome {
    if request.output_path.exists() {
        info!(
            "片段 {} 輸出已存在，跳過: {}",
            request.ordinal,
            request.output_path.display()
        );
        return skipped(request);
    }

    let max_attempts = retries.saturating_add(1);
    let mut attempts = 0;
    let mut last_error = String::new();

    while attempts < max_attempts {
        if shutdown_signal.load(Ordering::SeqCst) {
            return ExtractionOutcome {
                ordinal: request.ordinal,
                output_path: request.output_path.clone(),
                attempts,
                status: ExtractionStatus::Cancelled,
            };
        }

        attempts += 1;
        match attempt(transcoder, request) {
            Ok(()) => {
                info!(
                    "片段 {} 擷取完成: {}",
                    request.ordinal,
                    request.output_path.display()
                );
                return ExtractionOutcome {
                    ordinal: request.ordinal,
                    output_path: request.output_path.clone(),
                    attempts,
                    status: ExtractionStatus::Completed,
                };
            }
            Err(e) => {
                warn!("片段 {} 第 {attempts} 次擷取失敗: {e:#}", request.ordinal);
                last_error = format!("{e:#}");
            }
        }
    }

    let failure = ExtractionFailure {
        ordinal: request.ordinal,
        message: last_error,
    };
    error!("{failure}");
    ExtractionOutcome {
        ordinal: request.ordinal,
        output_path: request.output_path.clone(),
        attempts,
        status: ExtractionStatus::Failed(failure),
    }
}

fn skipped(request: &ExtractionRequest) -> ExtractionOutcome {
    ExtractionOutcome {
        ordinal: request.ordinal,
        output_path: request.output_path.clone(),
        attempts: 0,
        status: ExtractionStatus::Skipped,
    }
}

/// 平行擷取所有片段，結果依片段編號排列
///
/// 收到中斷信號後，尚未開始的片段標記為取消。輸出路徑與前面的片段重複時，
/// 只擷取第一個。
pub fn extract_segments<T: Transcoder>(
    transcoder: &T,
    requests: &[ExtractionRequest],
    settings: &PackagerSettings,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<Vec<ExtractionOutcome>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.max_parallel_jobs)
        .build()
        .context("無法建立擷取執行緒池")?;

    let progress_bar = ProgressBar::new(requests.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("無效的進度條樣式")?
            .progress_chars("#>-"),
    );

    let mut claimed = HashSet::new();
    let duplicated: Vec<bool> = requests
        .iter()
        .map(|request| !claimed.insert(request.output_path.as_path()))
        .collect();

    let outcomes = pool.install(|| {
        requests
            .par_iter()
            .zip(duplicated.par_iter())
            .map(|(request, &duplicate)| {
                let outcome = if duplicate {
                    warn!(
                        "片段 {} 的輸出與其他片段同名，跳過: {}",
                        request.ordinal,
                        request.output_path.display()
                    );
                    skipped(request)
                } else {
                    extract_segment(
                        transcoder,
                        request,
                        settings.extraction_retries,
                        shutdown_signal,
                    )
                };
                progress_bar.inc(1);
                outcome
            })
            .collect::<Vec<_>>()
    });

    progress_bar.finish_and_clear();
    Ok(outcomes)
}
