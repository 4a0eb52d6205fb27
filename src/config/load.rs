use crate::config::types::{Config, UserSettings};
use crate::error::ConfigurationError;
use log::info;
use std::fs;
use std::path::Path;

/// 設定檔位於目前工作目錄
pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    /// 載入設定；設定檔不存在時使用預設值，內容無法辨識或互相矛盾時回傳錯誤
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigurationError> {
        let settings = Self::load_settings(path)?;
        settings.validate()?;
        Ok(Self { settings })
    }

    fn load_settings(path: &Path) -> Result<UserSettings, ConfigurationError> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = serde_json::from_str(&content).map_err(|source| {
            ConfigurationError::Unrecognized {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!("已載入設定: {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("settings.json")).unwrap();
        assert_eq!(config.settings, UserSettings::default());
    }

    #[test]
    fn test_unrecognized_option_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"split": {"split_on_everything": true}}"#).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigurationError::Unrecognized { .. })
        ));
    }

    #[test]
    fn test_contradictory_options_are_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"split": {"ignore_technical_changes": true}, "packager": {"container": "mov"}}"#,
        )
        .unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigurationError::IgnoreChangesWithMov)
        ));
    }

    #[test]
    fn test_unbounded_retries_are_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"packager": {"extraction_retries": 4294967295}}"#).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigurationError::TooManyRetries { .. })
        ));
    }
}
