use crate::config::load::SETTINGS_FILE;
use crate::config::types::UserSettings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    save_settings_to(settings, Path::new(SETTINGS_FILE))
}

pub fn save_settings_to(settings: &UserSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, OutputContainer};
    use tempfile::TempDir;

    #[test]
    fn test_saved_settings_load_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut settings = UserSettings::default();
        settings.split.split_on_recording_start = true;
        settings.packager.container = OutputContainer::Mov;
        settings.packager.max_parallel_jobs = 4;
        save_settings_to(&settings, &path).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings, settings);
    }
}
