use crate::domain::model::DeployReport;
use crate::utils::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write_json_report<P: AsRef<Path>>(report: &DeployReport, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{MissingDll, SkipReason, SkippedDll};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_report_json_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("deploy.json");

        let mut report = DeployReport::new(
            PathBuf::from("C:/app/app.exe"),
            PathBuf::from("C:/app"),
            "pei-x86-64".to_string(),
            true,
        );
        report.skipped.push(SkippedDll {
            name: "kernel32.dll".to_string(),
            reason: SkipReason::SystemDll,
            required_by: PathBuf::from("C:/app/app.exe"),
        });
        report.missing.push(MissingDll {
            name: "libgomp-1.dll".to_string(),
            required_by: PathBuf::from("C:/app/app.exe"),
        });

        write_json_report(&report, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["binary_format"], "pei-x86-64");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["skipped"][0]["reason"], "system_dll");
        assert_eq!(json["missing"][0]["name"], "libgomp-1.dll");

        let back: DeployReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.missing, report.missing);
    }
}
