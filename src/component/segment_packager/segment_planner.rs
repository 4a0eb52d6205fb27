//! 片段規劃
//!
//! 依串流順序逐一讀入 frame，遇到切割條件時關閉目前片段並開啟新片段。
//! 片段的結束點要等看到下一個片段的第一個 frame（或串流結束）才能決定。

use super::change_predicate::{SplitOptions, should_start_new_segment};
use super::frame_record::FrameRecord;
use super::segment::SegmentDescriptor;
use crate::error::PlanError;
use log::debug;

/// 逐 frame 規劃片段的狀態機
///
/// 中途放棄（drop）時，尚未關閉的片段會一併丟棄，不會產生不完整的結果。
pub struct SegmentPlanner {
    options: SplitOptions,
    position: usize,
    previous: Option<FrameRecord>,
    open: Option<SegmentDescriptor>,
    closed: Vec<SegmentDescriptor>,
}

impl SegmentPlanner {
    #[must_use]
    pub const fn new(options: SplitOptions) -> Self {
        Self {
            options,
            position: 0,
            previous: None,
            open: None,
            closed: Vec::new(),
        }
    }

    /// 讀入下一個 frame
    pub fn push(&mut self, frame: &FrameRecord) -> Result<(), PlanError> {
        let (sequence_index, pts) = required_fields(self.position, frame)?;

        match should_start_new_segment(self.previous.as_ref(), frame, &self.options) {
            Some(reason) => {
                if let Some(segment) = self.open.take() {
                    let closed = self.close(segment, Some((frame, pts)));
                    self.closed.push(closed);
                }
                debug!(
                    "第 {} 個 frame 開始新片段 ({reason})",
                    self.position
                );
                self.open = Some(SegmentDescriptor::open(
                    self.closed.len() + 1,
                    self.position,
                    sequence_index,
                    pts,
                    frame,
                    reason,
                ));
            }
            None => {
                if let Some(segment) = self.open.as_mut() {
                    segment.frame_count += 1;
                }
            }
        }

        self.previous = Some(frame.clone());
        self.position += 1;
        Ok(())
    }

    /// 串流結束，關閉最後一個片段並回傳完整規劃
    #[must_use]
    pub fn finish(mut self) -> Vec<SegmentDescriptor> {
        if let Some(segment) = self.open.take() {
            let closed = self.close(segment, None);
            self.closed.push(closed);
        }
        self.closed
    }

    /// 決定片段結束點
    ///
    /// - 下一個片段在同一個 run 內開始：結束點為下一個片段的起點
    /// - 下一個片段在新的 run 開始：結束點為本片段最後一個 run 的結束點
    ///   （未記錄時退回下一個片段的起點）
    /// - 串流結束：最後一個 run 的結束點，未記錄時保持空白
    fn close(
        &self,
        mut segment: SegmentDescriptor,
        next: Option<(&FrameRecord, &str)>,
    ) -> SegmentDescriptor {
        let last_run_end = self
            .previous
            .as_ref()
            .map(|last| last.end_pts_of_run.as_str())
            .unwrap_or_default();

        segment.end_pts = match (next, self.previous.as_ref()) {
            (Some((next_frame, next_pts)), Some(last)) if next_frame.continues_run_of(last) => {
                next_pts.to_string()
            }
            (Some((_, next_pts)), _) if last_run_end.is_empty() => next_pts.to_string(),
            _ => last_run_end.to_string(),
        };
        segment
    }
}

fn required_fields(position: usize, frame: &FrameRecord) -> Result<(usize, &str), PlanError> {
    let sequence_index = frame.sequence_index.ok_or(PlanError::MalformedInput {
        frame: position,
        field: "sequence_index",
    })?;
    let pts = frame
        .pts
        .as_deref()
        .filter(|pts| !pts.is_empty())
        .ok_or(PlanError::MalformedInput {
            frame: position,
            field: "pts",
        })?;
    Ok((sequence_index, pts))
}

/// 將完整的 frame 序列規劃為有序的片段列表
///
/// 空序列回傳空規劃；任一 frame 缺少必要欄位時整份規劃失敗。
pub fn plan(
    frames: &[FrameRecord],
    options: &SplitOptions,
) -> Result<Vec<SegmentDescriptor>, PlanError> {
    let mut planner = SegmentPlanner::new(*options);
    for frame in frames {
        planner.push(frame)?;
    }
    Ok(planner.finish())
}
