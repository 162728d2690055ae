//! 报告导出

use anyhow::{Context, Result};
use medscan_core::utils::report_file_name;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 确定导出路径：显式路径优先，否则在导出目录下使用默认文件名
pub fn resolve_export_path(explicit: Option<&Path>, output_dir: &Path, patient_name: &str) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => output_dir.join(report_file_name(patient_name)),
    }
}

/// 以 UTF-8 写出报告文本
pub fn write_report(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, document)
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    info!("Report exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_export_path() {
        let dir = Path::new("/tmp/reports");
        assert_eq!(
            resolve_export_path(None, dir, "Козлова Анна Викторовна"),
            PathBuf::from("/tmp/reports/заключение_Козлова Анна Викторовна.txt")
        );
        assert_eq!(
            resolve_export_path(Some(Path::new("out.txt")), dir, "x"),
            PathBuf::from("out.txt")
        );
    }

    #[test]
    fn test_write_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.txt");

        write_report(&path, "МЕДИЦИНСКОЕ ЗАКЛЮЧЕНИЕ\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "МЕДИЦИНСКОЕ ЗАКЛЮЧЕНИЕ\n");
    }
}
