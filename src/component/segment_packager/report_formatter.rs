use super::segment::SegmentDescriptor;

const HEADERS: [&str; 15] = [
    "#",
    "Seq",
    "PTS",
    "Timecode",
    "Recorded",
    "Size",
    "Rate",
    "Aspect",
    "Chroma",
    "Audio",
    "Ch",
    "RecStart",
    "TcJump",
    "RdtJump",
    "SeqStart",
];

/// 需要靠右對齊的欄位
const NUMERIC_COLUMNS: [bool; 15] = [
    true, true, false, false, false, false, true, false, false, true, true, false, false, false,
    false,
];

fn flag(value: bool) -> String {
    let mark = if value { "Y" } else { "" };
    mark.to_string()
}

fn row(segment: &SegmentDescriptor) -> [String; 15] {
    let pts_range = match segment.end_bound() {
        Some(end) => format!("{} - {}", segment.start_pts, end),
        None => format!("{} - *", segment.start_pts),
    };

    [
        segment.ordinal.to_string(),
        segment.sequence_index.to_string(),
        pts_range,
        segment.start_timecode.clone(),
        segment.start_recording_datetime.clone(),
        segment.technical.frame_size.clone(),
        segment.technical.video_rate.clone(),
        segment.technical.aspect_ratio.clone(),
        segment.technical.chroma_subsampling.clone(),
        segment.technical.audio_rate.clone(),
        segment
            .technical
            .channel_count
            .map(|c| c.to_string())
            .unwrap_or_default(),
        flag(segment.is_recording_start),
        flag(segment.timecode_discontinuous),
        flag(segment.recording_time_discontinuous),
        flag(segment.starts_sequence),
    ]
}

/// 將片段規劃輸出為文字表格，每個片段一列
///
/// `*` 表示片段延伸到來源結尾。
#[must_use]
pub fn format_table(segments: &[SegmentDescriptor]) -> String {
    let header: [String; 15] = HEADERS.map(str::to_string);
    let rows: Vec<[String; 15]> = segments.iter().map(row).collect();

    let mut widths = [0usize; 15];
    for cells in std::iter::once(&header).chain(rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String; 15]| -> String {
        let line = cells
            .iter()
            .zip(widths)
            .zip(NUMERIC_COLUMNS)
            .map(|((cell, width), numeric)| {
                if numeric {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let mut text = render(&header);
    text.push('\n');
    text.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    text.push('\n');
    for cells in &rows {
        text.push_str(&render(cells));
        text.push('\n');
    }
    text
}
