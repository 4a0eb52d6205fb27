//! DV 片段封裝元件
//!
//! 流程：
//! A. 取得每個 frame 的資訊（dvrescue）
//! B. 依切割規則規劃片段
//! C. 輸出片段表格
//! D. 平行以 ffmpeg 擷取各片段

mod change_predicate;
mod ffmpeg_command;
mod frame_record;
mod main;
mod report_formatter;
mod segment;
mod segment_extractor;
mod segment_planner;

pub use change_predicate::{SplitOptions, SplitReason, should_start_new_segment};
pub use ffmpeg_command::ExtractionRequest;
pub use frame_record::{FrameRecord, TechnicalAttributes};
pub use main::{PackagerMode, SegmentPackager};
pub use report_formatter::format_table;
pub use segment::SegmentDescriptor;
pub use segment_extractor::{
    ExtractionOutcome, ExtractionStatus, ExtractionSummary, FfmpegTranscoder, Transcoder,
    extract_segment, extract_segments,
};
pub use segment_planner::{SegmentPlanner, plan};
