use super::ffmpeg_command::ExtractionRequest;
use super::report_formatter::format_table;
use super::segment::SegmentDescriptor;
use super::segment_extractor::{
    ExtractionOutcome, ExtractionStatus, ExtractionSummary, FfmpegTranscoder, extract_segments,
};
use super::segment_planner::plan;
use crate::config::{Config, PackagerSettings};
use crate::tools::{ensure_directory_exists, load_frames, scan_dv_files};
use anyhow::{Result, bail};
use console::style;
use dialoguer::{Confirm, Input};
use log::{error, info, warn};
use rust_i18n::t;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagerMode {
    /// 只顯示片段規劃
    Preview,
    /// 規劃後擷取片段
    Package,
}

pub struct SegmentPackager {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl SegmentPackager {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self, mode: PackagerMode) -> Result<()> {
        let title = match mode {
            PackagerMode::Preview => t!("packager.title_preview"),
            PackagerMode::Package => t!("packager.title_package"),
        };
        println!("{}", style(title).cyan().bold());

        let input_path = self.prompt_input_path()?;
        let sources = discover_sources(Path::new(&input_path))?;

        if sources.is_empty() {
            println!("{}", style(t!("packager.no_sources")).yellow());
            return Ok(());
        }

        println!(
            "{}",
            style(t!("packager.found_sources", count = sources.len())).green()
        );
        for (index, source) in sources.iter().enumerate() {
            println!("  {}. {}", index + 1, source.display());
        }

        let (sources, conflicting) = match mode {
            PackagerMode::Package => {
                split_conflicting_sources(sources, &self.config.settings.packager)
            }
            PackagerMode::Preview => (sources, Vec::new()),
        };
        for source in &conflicting {
            warn!("輸出檔名與其他來源相同，跳過: {}", source.display());
            println!(
                "{} {}",
                style(t!("packager.source_conflict")).yellow(),
                source.display()
            );
        }

        let mut total = ExtractionSummary::default();
        let mut failed_sources = 0;

        for source in &sources {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷信號，停止處理剩餘檔案");
                break;
            }

            match self.process_source(source, mode) {
                Ok(summary) => {
                    total.succeeded += summary.succeeded;
                    total.failed += summary.failed;
                    total.cancelled += summary.cancelled;
                    total.skipped += summary.skipped;
                }
                Err(e) => {
                    failed_sources += 1;
                    error!("處理失敗 {}: {e:#}", source.display());
                    eprintln!(
                        "{} {}: {e:#}",
                        style(t!("common.error_prefix")).red().bold(),
                        source.display()
                    );
                }
            }
        }

        if mode == PackagerMode::Package {
            self.print_summary(&total, failed_sources, conflicting.len());
        }

        Ok(())
    }

    fn prompt_input_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt(t!("packager.prompt_input"))
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn process_source(&self, source: &Path, mode: PackagerMode) -> Result<ExtractionSummary> {
        println!();
        println!("{}", style(source.display()).bold());

        let frames = load_frames(source)?;
        let segments = plan(&frames, &self.config.settings.split)?;
        info!(
            "{}: {} 個 frame，規劃為 {} 個片段",
            source.display(),
            frames.len(),
            segments.len()
        );

        print!("{}", format_table(&segments));

        if mode == PackagerMode::Preview || segments.is_empty() {
            return Ok(ExtractionSummary::default());
        }

        let proceed = Confirm::new()
            .with_prompt(t!("packager.confirm_extract", count = segments.len()))
            .default(true)
            .interact()?;
        if !proceed {
            return Ok(ExtractionSummary::default());
        }

        let outcomes = self.extract(source, &segments)?;
        self.print_failures(&outcomes);
        Ok(ExtractionSummary::from_outcomes(&outcomes))
    }

    fn extract(
        &self,
        source: &Path,
        segments: &[SegmentDescriptor],
    ) -> Result<Vec<ExtractionOutcome>> {
        let packager = &self.config.settings.packager;
        let output_dir = output_directory_for(source, packager);
        ensure_directory_exists(&output_dir)?;

        let requests: Vec<ExtractionRequest> = segments
            .iter()
            .map(|segment| ExtractionRequest::from_segment(source, segment, &output_dir, packager))
            .collect();

        extract_segments(&FfmpegTranscoder, &requests, packager, &self.shutdown_signal)
    }

    fn print_failures(&self, outcomes: &[ExtractionOutcome]) {
        for outcome in outcomes {
            if let ExtractionStatus::Failed(failure) = &outcome.status {
                println!("  {} {}", style("✗").red(), failure);
            }
        }
    }

    fn print_summary(
        &self,
        summary: &ExtractionSummary,
        failed_sources: usize,
        conflicting_sources: usize,
    ) {
        println!();
        println!("{}", style(t!("packager.summary_title")).cyan().bold());
        println!(
            "  {}",
            t!("packager.summary_succeeded", count = style(summary.succeeded).green().to_string())
        );
        if summary.failed > 0 {
            println!(
                "  {}",
                t!("packager.summary_failed", count = style(summary.failed).red().to_string())
            );
        }
        if summary.cancelled > 0 {
            println!(
                "  {}",
                t!("packager.summary_cancelled", count = style(summary.cancelled).yellow().to_string())
            );
        }
        if summary.skipped > 0 {
            println!(
                "  {}",
                t!("packager.summary_skipped", count = style(summary.skipped).dim().to_string())
            );
        }
        if conflicting_sources > 0 {
            println!(
                "  {}",
                t!("packager.summary_conflicting_sources", count = style(conflicting_sources).yellow().to_string())
            );
        }
        if failed_sources > 0 {
            println!(
                "  {}",
                t!("packager.summary_failed_sources", count = style(failed_sources).red().to_string())
            );
        }

        info!(
            "片段擷取完成 - 成功: {}, 失敗: {}, 取消: {}, 跳過: {}, 無法規劃的檔案: {failed_sources}, 檔名衝突的檔案: {conflicting_sources}",
            summary.succeeded, summary.failed, summary.cancelled, summary.skipped
        );
    }
}

/// 未設定輸出資料夾時，輸出到來源檔所在資料夾
fn output_directory_for(source: &Path, packager: &PackagerSettings) -> PathBuf {
    packager.output_directory.clone().unwrap_or_else(|| {
        source
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    })
}

/// 輸出檔名只取來源主檔名，例如 `tape.dv` 與 `tape.dif` 會寫到同一組檔案；
/// 保留第一個來源，其餘回傳為衝突
fn split_conflicting_sources(
    sources: Vec<PathBuf>,
    packager: &PackagerSettings,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut claimed = HashSet::new();
    sources.into_iter().partition(|source| {
        let stem = source.file_stem().unwrap_or_default();
        claimed.insert(output_directory_for(source, packager).join(stem))
    })
}

/// 輸入為檔案時直接處理；為資料夾時掃描其中的 DV 檔
fn discover_sources(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if input.is_dir() {
        return scan_dv_files(input);
    }
    bail!("路徑不存在: {}", input.display())
}
