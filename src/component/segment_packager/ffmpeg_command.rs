use super::frame_record::TechnicalAttributes;
use super::segment::SegmentDescriptor;
use crate::config::{OutputContainer, PackagerSettings};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static REGEX_TIMECODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}[:;.]\d{2}$").expect("Invalid regex"));

static REGEX_RECORDING_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2}:\d{2})").expect("Invalid regex")
});

/// 單一片段的擷取請求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub ordinal: usize,
    pub source_path: PathBuf,
    pub start_pts: String,
    /// `None` 表示擷取到來源結尾
    pub end_pts: Option<String>,
    pub output_path: PathBuf,
    pub timecode: Option<String>,
    pub creation_time: Option<String>,
    pub technical: TechnicalAttributes,
    pub container: OutputContainer,
}

impl ExtractionRequest {
    #[must_use]
    pub fn from_segment(
        source_path: &Path,
        segment: &SegmentDescriptor,
        output_dir: &Path,
        settings: &PackagerSettings,
    ) -> Self {
        Self {
            ordinal: segment.ordinal,
            source_path: source_path.to_path_buf(),
            start_pts: segment.start_pts.clone(),
            end_pts: segment.end_bound().map(str::to_string),
            output_path: Self::generate_output_path(
                source_path,
                output_dir,
                segment.ordinal,
                settings,
            ),
            timecode: normalize_timecode(&segment.start_timecode),
            creation_time: recording_datetime_to_iso(&segment.start_recording_datetime),
            technical: segment.technical.clone(),
            container: settings.container,
        }
    }

    fn generate_output_path(
        source_path: &Path,
        output_dir: &Path,
        ordinal: usize,
        settings: &PackagerSettings,
    ) -> PathBuf {
        let file_stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        output_dir.join(format!(
            "{file_stem}{}{ordinal:03}.{}",
            settings.output_suffix,
            settings.container.extension()
        ))
    }

    /// 產生 ffmpeg 參數，輸出寫入 `destination`
    #[must_use]
    pub fn build_args(&self, destination: &Path) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-nostdin", "-loglevel", "error"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();

        args.push("-ss".to_string());
        args.push(self.start_pts.clone());
        if let Some(end) = &self.end_pts {
            args.push("-to".to_string());
            args.push(end.clone());
        }

        args.push("-i".to_string());
        args.push(format!("file:{}", self.source_path.display()));
        args.extend(["-map", "0", "-c", "copy"].map(str::to_string));

        if let Some(timecode) = &self.timecode {
            args.push("-timecode".to_string());
            args.push(timecode.clone());
        }
        if let Some(creation_time) = &self.creation_time {
            args.push("-metadata".to_string());
            args.push(format!("creation_time={creation_time}"));
        }
        if !self.technical.aspect_ratio.is_empty() {
            args.push("-aspect".to_string());
            args.push(self.technical.aspect_ratio.replace('/', ":"));
        }

        args.push("-f".to_string());
        args.push(self.container.ffmpeg_format().to_string());
        args.push("-y".to_string());
        args.push(destination.to_string_lossy().to_string());
        args
    }

    #[must_use]
    pub fn build_command(&self, destination: &Path) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(self.build_args(destination));
        cmd
    }
}

/// 只接受 ffmpeg `-timecode` 能解析的格式
fn normalize_timecode(timecode: &str) -> Option<String> {
    REGEX_TIMECODE
        .is_match(timecode)
        .then(|| timecode.to_string())
}

/// "2003-08-12 10:12:34" 或帶 frame 的 "2003-08-12 10:12:34:05" 轉為 ISO 8601
fn recording_datetime_to_iso(recording_datetime: &str) -> Option<String> {
    REGEX_RECORDING_DATETIME
        .captures(recording_datetime)
        .map(|caps| format!("{}T{}", &caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::segment_packager::{FrameRecord, SplitOptions, plan};

    fn segment(timecode: &str, rdt: &str, end_pts: &str) -> SegmentDescriptor {
        let mut frame = FrameRecord::new(0, 0, "00:00:01.001000");
        frame.timecode = timecode.to_string();
        frame.recording_datetime = rdt.to_string();
        frame.end_pts_of_run = end_pts.to_string();
        frame.technical.aspect_ratio = "4/3".to_string();
        plan(&[frame], &SplitOptions::default()).unwrap().remove(0)
    }

    #[test]
    fn test_generate_output_path() {
        let settings = PackagerSettings::default();
        let request = ExtractionRequest::from_segment(
            Path::new("/tapes/tape01.dv"),
            &segment("", "", ""),
            Path::new("/out"),
            &settings,
        );
        assert_eq!(request.output_path, Path::new("/out/tape01_part001.mkv"));
    }

    #[test]
    fn test_generate_output_path_mov() {
        let settings = PackagerSettings {
            container: OutputContainer::Mov,
            output_suffix: "-seg".to_string(),
            ..PackagerSettings::default()
        };
        let request = ExtractionRequest::from_segment(
            Path::new("/tapes/tape.01.dv"),
            &segment("", "", ""),
            Path::new("/out"),
            &settings,
        );
        assert_eq!(request.output_path, Path::new("/out/tape.01-seg001.mov"));
    }

    #[test]
    fn test_args_with_bounds_and_metadata() {
        let request = ExtractionRequest::from_segment(
            Path::new("/tapes/tape01.dv"),
            &segment("00:10:00;02", "2003-08-12 10:12:34:05", "00:00:05.005000"),
            Path::new("/out"),
            &PackagerSettings::default(),
        );
        let args = request.build_args(Path::new("/out/tmp.partial"));
        let joined = args.join(" ");

        assert!(joined.contains("-ss 00:00:01.001000 -to 00:00:05.005000"));
        assert!(joined.contains("-i file:/tapes/tape01.dv"));
        assert!(joined.contains("-timecode 00:10:00;02"));
        assert!(joined.contains("-metadata creation_time=2003-08-12T10:12:34"));
        assert!(joined.contains("-aspect 4:3"));
        assert!(joined.contains("-f matroska"));
        assert_eq!(args.last().unwrap(), "/out/tmp.partial");
    }

    #[test]
    fn test_open_ended_segment_has_no_to() {
        let request = ExtractionRequest::from_segment(
            Path::new("/tapes/tape01.dv"),
            &segment("", "", ""),
            Path::new("/out"),
            &PackagerSettings::default(),
        );
        let args = request.build_args(Path::new("/out/tmp.partial"));

        assert_eq!(request.end_pts, None);
        assert!(!args.iter().any(|a| a == "-to"));
        assert!(!args.iter().any(|a| a == "-timecode"));
        assert!(!args.iter().any(|a| a == "-metadata"));
    }

    #[test]
    fn test_recording_datetime_without_date_is_skipped() {
        assert_eq!(recording_datetime_to_iso("10:12:34"), None);
        assert_eq!(
            recording_datetime_to_iso("2001-01-01 00:00:00"),
            Some("2001-01-01T00:00:00".to_string())
        );
    }

    #[test]
    fn test_normalize_timecode() {
        assert_eq!(normalize_timecode(""), None);
        assert_eq!(normalize_timecode("garbage"), None);
        assert_eq!(
            normalize_timecode("01:02:03:04"),
            Some("01:02:03:04".to_string())
        );
    }
}
