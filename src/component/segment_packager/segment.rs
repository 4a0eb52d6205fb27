use super::change_predicate::SplitReason;
use super::frame_record::{FrameRecord, TechnicalAttributes};
use std::ops::Range;

/// 規劃結果中的單一輸出片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDescriptor {
    /// 從 1 開始的片段編號
    pub ordinal: usize,
    pub sequence_index: usize,
    /// 第一個 frame 在輸入序列中的位置
    pub first_frame: usize,
    pub frame_count: usize,
    pub start_pts: String,
    /// 空字串代表延伸到來源結尾
    pub end_pts: String,
    pub start_timecode: String,
    pub start_recording_datetime: String,
    pub technical: TechnicalAttributes,
    pub starts_sequence: bool,
    pub is_recording_start: bool,
    pub timecode_discontinuous: bool,
    pub recording_time_discontinuous: bool,
    pub triggered_by: SplitReason,
}

impl SegmentDescriptor {
    /// 以片段的第一個 frame 建立描述，結束點與 frame 數稍後由規劃器補上
    pub(crate) fn open(
        ordinal: usize,
        position: usize,
        sequence_index: usize,
        start_pts: &str,
        first: &FrameRecord,
        triggered_by: SplitReason,
    ) -> Self {
        Self {
            ordinal,
            sequence_index,
            first_frame: position,
            frame_count: 1,
            start_pts: start_pts.to_string(),
            end_pts: String::new(),
            start_timecode: first.timecode.clone(),
            start_recording_datetime: first.recording_datetime.clone(),
            technical: first.technical.clone(),
            starts_sequence: first.starts_sequence(),
            is_recording_start: first.is_recording_start,
            timecode_discontinuous: first.timecode_discontinuous,
            recording_time_discontinuous: first.recording_time_discontinuous,
            triggered_by,
        }
    }

    /// 片段涵蓋的輸入 frame 位置
    #[must_use]
    pub const fn frame_range(&self) -> Range<usize> {
        self.first_frame..self.first_frame + self.frame_count
    }

    /// 結束點；`None` 表示擷取到來源結尾
    #[must_use]
    pub fn end_bound(&self) -> Option<&str> {
        (!self.end_pts.is_empty()).then_some(self.end_pts.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_copies_first_frame() {
        let mut first = FrameRecord::new(3, 0, "00:01:00.000000");
        first.timecode = "00:10:00;00".to_string();
        first.technical.frame_size = "720x480".to_string();
        first.is_recording_start = true;

        let segment =
            SegmentDescriptor::open(2, 40, 3, "00:01:00.000000", &first, SplitReason::RecordingStart);

        assert_eq!(segment.ordinal, 2);
        assert_eq!(segment.frame_range(), 40..41);
        assert_eq!(segment.start_timecode, "00:10:00;00");
        assert_eq!(segment.technical.frame_size, "720x480");
        assert!(segment.starts_sequence);
        assert!(segment.is_recording_start);
        assert_eq!(segment.end_bound(), None);
    }
}
