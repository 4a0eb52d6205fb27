use super::path_tools::sidecar_path;
use anyhow::{Context, Result, bail};
use log::info;
use std::path::{Path, PathBuf};
use std::process::Command;

/// dvrescue 分析結果的快取檔後綴
pub const DVRESCUE_XML_SUFFIX: &str = ".dvrescue.xml";

#[must_use]
pub fn dvrescue_xml_path(source: &Path) -> PathBuf {
    sidecar_path(source, DVRESCUE_XML_SUFFIX)
}

fn build_command(source: &Path, xml_path: &Path) -> Command {
    let mut cmd = Command::new("dvrescue");
    cmd.arg(source).arg("-x").arg(xml_path);
    cmd
}

/// 使用 dvrescue 分析 DV 檔，輸出 XML 到 `xml_path`
pub fn run_dvrescue(source: &Path, xml_path: &Path) -> Result<()> {
    info!(
        "執行 dvrescue 分析: {} -> {}",
        source.display(),
        xml_path.display()
    );

    let output = build_command(source, xml_path)
        .output()
        .with_context(|| format!("無法執行 dvrescue: {}", source.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("dvrescue 執行失敗: {}", stderr.trim());
    }

    if !xml_path.exists() {
        bail!("dvrescue 未產生 XML: {}", xml_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dvrescue_xml_path() {
        assert_eq!(
            dvrescue_xml_path(Path::new("/tapes/tape01.dv")),
            PathBuf::from("/tapes/tape01.dv.dvrescue.xml")
        );
    }

    #[test]
    fn test_build_command_args() {
        let cmd = build_command(Path::new("/tapes/a.dv"), Path::new("/tapes/a.dv.dvrescue.xml"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(cmd.get_program(), "dvrescue");
        assert_eq!(args, ["/tapes/a.dv", "-x", "/tapes/a.dv.dvrescue.xml"]);
    }
}
