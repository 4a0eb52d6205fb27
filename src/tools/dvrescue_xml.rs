//! dvrescue XML 解析
//!
//! dvrescue 以 `<frames>` 區分技術參數相同的連續 frame，每個 `<frames>` 視為一個
//! run；其中只列出部分 `<frame>`（第一個、最後一個、有錯誤或在變化前的 frame）。

use crate::component::segment_packager::{FrameRecord, TechnicalAttributes};
use anyhow::{Context, Result, bail};
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static REGEX_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(frames|frame)\b([^>]*)>").expect("Invalid regex"));

static REGEX_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w:]+)="([^"]*)""#).expect("Invalid regex"));

/// 目前所在的 `<frames>` 區塊
struct RunContext {
    sequence_index: usize,
    first_n: Option<usize>,
    listed: usize,
    end_pts: String,
    technical: TechnicalAttributes,
}

fn attributes(raw: &str) -> HashMap<&str, String> {
    REGEX_ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            Some((key, unescape(value)))
        })
        .collect()
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn text(attrs: &HashMap<&str, String>, key: &str) -> String {
    attrs.get(key).cloned().unwrap_or_default()
}

fn flag(attrs: &HashMap<&str, String>, key: &str) -> bool {
    attrs.get(key).is_some_and(|v| v == "1")
}

/// 解析 dvrescue XML 內容為 frame 列表
pub fn parse_dvrescue_xml(xml: &str) -> Result<Vec<FrameRecord>> {
    let mut frames = Vec::new();
    let mut run: Option<RunContext> = None;
    let mut run_count = 0;

    for caps in REGEX_ELEMENT.captures_iter(xml) {
        let attrs = attributes(&caps[2]);

        if &caps[1] == "frames" {
            run = Some(RunContext {
                sequence_index: run_count,
                first_n: None,
                listed: 0,
                end_pts: text(&attrs, "end_pts"),
                technical: TechnicalAttributes {
                    frame_size: text(&attrs, "size"),
                    video_rate: text(&attrs, "video_rate"),
                    chroma_subsampling: text(&attrs, "chroma_subsampling"),
                    aspect_ratio: text(&attrs, "aspect_ratio"),
                    audio_rate: text(&attrs, "audio_rate"),
                    channel_count: attrs.get("channels").and_then(|c| c.parse().ok()),
                },
            });
            run_count += 1;
            continue;
        }

        let Some(context) = run.as_mut() else {
            bail!("<frame> 出現在 <frames> 之外");
        };

        let n = attrs.get("n").and_then(|n| n.parse::<usize>().ok());
        let index_in_sequence = match (n, context.first_n) {
            (Some(n), Some(first)) => n.saturating_sub(first),
            (Some(n), None) => {
                context.first_n = Some(n);
                0
            }
            (None, _) => context.listed,
        };
        context.listed += 1;

        frames.push(FrameRecord {
            sequence_index: Some(context.sequence_index),
            index_in_sequence,
            pts: attrs.get("pts").cloned(),
            end_pts_of_run: context.end_pts.clone(),
            timecode: text(&attrs, "tc"),
            recording_datetime: text(&attrs, "rdt"),
            technical: context.technical.clone(),
            is_recording_start: flag(&attrs, "rec_start"),
            recording_time_discontinuous: flag(&attrs, "rdt_nc"),
            timecode_discontinuous: flag(&attrs, "tc_nc"),
        });
    }

    debug!("dvrescue XML: {run_count} 個 run，{} 個 frame", frames.len());
    Ok(frames)
}

/// 讀取並解析 dvrescue XML 檔案
pub fn read_dvrescue_xml(path: &Path) -> Result<Vec<FrameRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("無法讀取 dvrescue XML: {}", path.display()))?;
    parse_dvrescue_xml(&content).with_context(|| format!("無法解析 dvrescue XML: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<dvrescue xmlns="https://mediaarea.net/dvrescue" version="1.1">
	<creator>
		<program>dvrescue</program>
	</creator>
	<media ref="/tapes/tape01.dv">
		<frames count="3" pts="00:00:00.000000" end_pts="00:00:00.100100" size="720x480" video_rate="30000/1001" chroma_subsampling="4:1:1" aspect_ratio="4/3" audio_rate="48000" channels="2">
			<frame n="0" pts="00:00:00.000000" tc="00:00:00;00" rdt="2003-08-12 10:12:34" rec_start="1"/>
			<frame n="2" pts="00:00:00.066733" tc="00:00:00;02" rdt="2003-08-12 10:12:34"/>
		</frames>
		<frames count="2" pts="00:00:00.100100" end_pts="00:00:00.166833" size="720x480" video_rate="30000/1001" chroma_subsampling="4:1:1" aspect_ratio="16/9" audio_rate="32000" channels="4">
			<frame n="3" pts="00:00:00.100100" tc="00:10:00;00" tc_nc="1" rdt="2003-08-13 09:00:00" rdt_nc="1">
				<sta t="10" n="3"/>
			</frame>
			<frame n="4" pts="00:00:00.133467" tc="00:10:00;01" rdt="2003-08-13 09:00:00"/>
		</frames>
	</media>
</dvrescue>
"#;

    #[test]
    fn test_parse_runs_and_frames() {
        let frames = parse_dvrescue_xml(SAMPLE).unwrap();

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].sequence_index, Some(0));
        assert_eq!(frames[1].index_in_sequence, 2);
        assert_eq!(frames[2].sequence_index, Some(1));
        assert_eq!(frames[2].index_in_sequence, 0);
        assert_eq!(frames[3].index_in_sequence, 1);
        assert_eq!(frames[0].end_pts_of_run, "00:00:00.100100");
        assert_eq!(frames[3].end_pts_of_run, "00:00:00.166833");
    }

    #[test]
    fn test_parse_attributes_and_flags() {
        let frames = parse_dvrescue_xml(SAMPLE).unwrap();

        assert!(frames[0].is_recording_start);
        assert_eq!(frames[0].timecode, "00:00:00;00");
        assert_eq!(frames[0].recording_datetime, "2003-08-12 10:12:34");
        assert_eq!(frames[0].technical.aspect_ratio, "4/3");
        assert_eq!(frames[0].technical.channel_count, Some(2));

        assert!(frames[2].timecode_discontinuous);
        assert!(frames[2].recording_time_discontinuous);
        assert!(!frames[2].is_recording_start);
        assert_eq!(frames[2].technical.audio_rate, "32000");
        assert_eq!(frames[2].technical.aspect_ratio, "16/9");
    }

    #[test]
    fn test_frame_without_pts_is_passed_through() {
        let xml = r#"<frames pts="0" end_pts="1"><frame n="0"/></frames>"#;
        let frames = parse_dvrescue_xml(xml).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pts, None);
    }

    #[test]
    fn test_frame_outside_frames_is_rejected() {
        assert!(parse_dvrescue_xml(r#"<frame n="0" pts="0"/>"#).is_err());
    }

    #[test]
    fn test_unescape_media_ref() {
        assert_eq!(unescape("a &amp; b &lt;c&gt;"), "a & b <c>");
    }

    #[test]
    fn test_flagged_frame_inside_group_splits() {
        use crate::component::segment_packager::{SplitOptions, SplitReason, plan};

        let xml = r#"<frames pts="0" end_pts="0.4" aspect_ratio="4/3">
            <frame n="0" pts="0.0" tc="00:00:00;00"/>
            <frame n="5" pts="0.2" tc="00:07:00;00" tc_nc="1"/>
            <frame n="9" pts="0.3" tc="00:07:00;04"/>
        </frames>"#;
        let frames = parse_dvrescue_xml(xml).unwrap();
        assert_eq!(frames[1].index_in_sequence, 5);
        assert!(frames[1].timecode_discontinuous);

        let options = SplitOptions {
            split_on_timecode_gap: true,
            ..SplitOptions::default()
        };
        let segments = plan(&frames, &options).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].triggered_by, SplitReason::TimecodeGap);
        assert_eq!(segments[0].end_pts, "0.2");
        assert_eq!(segments[1].end_pts, "0.4");
    }
}
