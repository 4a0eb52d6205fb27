use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    }
    Ok(())
}

/// 在完整檔名後加上後綴，例如 `tape.dv` -> `tape.dv.dvrescue.xml`
#[must_use]
pub fn sidecar_path(source: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = source.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    source.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_path_keeps_extension() {
        assert_eq!(
            sidecar_path(Path::new("/tapes/tape01.dv"), ".dvrescue.xml"),
            PathBuf::from("/tapes/tape01.dv.dvrescue.xml")
        );
    }

    #[test]
    fn test_ensure_directory_exists_creates_nested() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_directory_exists(&nested).unwrap();
    }
}
