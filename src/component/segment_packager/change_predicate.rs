use super::frame_record::FrameRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 切割規則
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitOptions {
    /// 技術參數改變時不切割
    pub ignore_technical_changes: bool,
    /// 遇到錄製起點時切割
    pub split_on_recording_start: bool,
    /// 錄製時間不連續時切割
    pub split_on_recording_time_gap: bool,
    /// 時間碼不連續時切割
    pub split_on_timecode_gap: bool,
}

/// 新片段的起因，依優先順序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitReason {
    StreamStart,
    TechnicalChange,
    RecordingStart,
    RecordingTimeGap,
    TimecodeGap,
}

impl SplitReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StreamStart => "stream-start",
            Self::TechnicalChange => "technical-change",
            Self::RecordingStart => "recording-start",
            Self::RecordingTimeGap => "recording-time-gap",
            Self::TimecodeGap => "timecode-gap",
        }
    }
}

impl fmt::Display for SplitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 判斷 `current` 是否開始新片段
///
/// 回傳 `Some(reason)` 表示要切割，`reason` 為優先順序最高的起因；
/// 多個起因同時成立時只回報一個，但是否切割不受影響。
#[must_use]
pub fn should_start_new_segment(
    previous: Option<&FrameRecord>,
    current: &FrameRecord,
    options: &SplitOptions,
) -> Option<SplitReason> {
    let Some(previous) = previous else {
        return Some(SplitReason::StreamStart);
    };

    if !options.ignore_technical_changes && current.technical != previous.technical {
        Some(SplitReason::TechnicalChange)
    } else if options.split_on_recording_start && current.is_recording_start {
        Some(SplitReason::RecordingStart)
    } else if options.split_on_recording_time_gap && current.recording_time_discontinuous {
        Some(SplitReason::RecordingTimeGap)
    } else if options.split_on_timecode_gap && current.timecode_discontinuous {
        Some(SplitReason::TimecodeGap)
    } else {
        None
    }
}
