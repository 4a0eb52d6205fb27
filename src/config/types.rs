use crate::component::segment_packager::SplitOptions;
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 介面語言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 片段輸出容器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputContainer {
    #[default]
    Mkv,
    Mov,
}

impl OutputContainer {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mkv => "mkv",
            Self::Mov => "mov",
        }
    }

    #[must_use]
    pub const fn ffmpeg_format(&self) -> &'static str {
        match self {
            Self::Mkv => "matroska",
            Self::Mov => "mov",
        }
    }
}

impl fmt::Display for OutputContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mkv => write!(f, "Matroska (.mkv)"),
            Self::Mov => write!(f, "QuickTime (.mov)"),
        }
    }
}

fn default_output_suffix() -> String {
    "_part".to_string()
}

const fn default_max_parallel_jobs() -> usize {
    2
}

/// 單一片段的重試上限
pub const MAX_EXTRACTION_RETRIES: u32 = 10;

const fn default_extraction_retries() -> u32 {
    1
}

/// 片段擷取設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagerSettings {
    #[serde(default)]
    pub container: OutputContainer,
    /// 輸出檔名為 `<原檔名><suffix><編號>.<副檔名>`
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
    /// 未設定時輸出到來源檔所在資料夾
    #[serde(default)]
    pub output_directory: Option<PathBuf>,
    #[serde(default = "default_max_parallel_jobs")]
    pub max_parallel_jobs: usize,
    #[serde(default = "default_extraction_retries")]
    pub extraction_retries: u32,
}

impl Default for PackagerSettings {
    fn default() -> Self {
        Self {
            container: OutputContainer::default(),
            output_suffix: default_output_suffix(),
            output_directory: None,
            max_parallel_jobs: default_max_parallel_jobs(),
            extraction_retries: default_extraction_retries(),
        }
    }
}

/// 使用者設定（settings.json）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserSettings {
    pub language: Language,
    pub split: SplitOptions,
    pub packager: PackagerSettings,
}

impl UserSettings {
    /// 檢查互相矛盾的設定
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.packager.max_parallel_jobs == 0 {
            return Err(ConfigurationError::NoParallelJobs);
        }
        if self.packager.extraction_retries > MAX_EXTRACTION_RETRIES {
            return Err(ConfigurationError::TooManyRetries {
                retries: self.packager.extraction_retries,
                max: MAX_EXTRACTION_RETRIES,
            });
        }
        if self.split.ignore_technical_changes && self.packager.container == OutputContainer::Mov {
            return Err(ConfigurationError::IgnoreChangesWithMov);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(UserSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_parallel_jobs_is_rejected() {
        let mut settings = UserSettings::default();
        settings.packager.max_parallel_jobs = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigurationError::NoParallelJobs)
        ));
    }

    #[test]
    fn test_unbounded_retries_are_rejected() {
        let mut settings = UserSettings::default();
        settings.packager.extraction_retries = MAX_EXTRACTION_RETRIES;
        assert!(settings.validate().is_ok());

        settings.packager.extraction_retries = u32::MAX;
        assert!(matches!(
            settings.validate(),
            Err(ConfigurationError::TooManyRetries { retries: u32::MAX, .. })
        ));
    }

    #[test]
    fn test_ignore_changes_with_mov_is_rejected() {
        let mut settings = UserSettings::default();
        settings.split.ignore_technical_changes = true;
        assert!(settings.validate().is_ok());

        settings.packager.container = OutputContainer::Mov;
        assert!(matches!(
            settings.validate(),
            Err(ConfigurationError::IgnoreChangesWithMov)
        ));
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"language": "zh-TW", "packager": {"container": "mov"}}"#)
                .unwrap();
        assert_eq!(settings.language, Language::ZhTw);
        assert_eq!(settings.packager.container, OutputContainer::Mov);
        assert_eq!(settings.packager.output_suffix, "_part");
        assert_eq!(settings.packager.max_parallel_jobs, 2);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!(serde_json::from_str::<UserSettings>(r#"{"language": "fr-FR"}"#).is_err());
        assert!(serde_json::from_str::<UserSettings>(r#"{"theme": "dark"}"#).is_err());
        assert!(
            serde_json::from_str::<UserSettings>(r#"{"packager": {"container": "avi"}}"#).is_err()
        );
    }
}
