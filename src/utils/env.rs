//! Environment and report handling utilities
//!
//! Reads the environment-level packaging toggle and writes the package
//! report consumed by the artifact store.

use crate::{error::RecipeError, error::Result, utils::fs::FileSystemUtils};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, env, path::Path};
use tracing::{debug, info, instrument};

/// Environment variable that restricts the run to packaging only
pub const PACKAGING_ENV: &str = "LOGR_CONAN_PACKAGING";

/// Summary of a finished packaging run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReport {
    pub package_name: String,
    pub version: String,
    /// Identity key handed to the artifact store
    pub package_id: String,
    /// Space-separated `flag=value` pairs
    pub options: String,
    /// Space-separated `name/version` requirements
    pub dependencies: String,
    /// Report timestamp in RFC3339 format
    pub build_date: String,
}

impl PackageReport {
    /// Create a report stamped with the current time
    pub fn new(
        package_name: impl Into<String>,
        version: impl Into<String>,
        package_id: impl Into<String>,
        options: impl Into<String>,
        dependencies: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            version: version.into(),
            package_id: package_id.into(),
            options: options.into(),
            dependencies: dependencies.into(),
            build_date: Utc::now().to_rfc3339(),
        }
    }
}

/// Writes and reads package reports in `.env` format
#[derive(Debug)]
pub struct ReportWriter {
    fs_utils: FileSystemUtils,
}

impl ReportWriter {
    /// Create a new report writer
    pub fn new() -> Self {
        Self {
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Write a report to `output_file`
    #[instrument(skip(self, report, output_file))]
    pub fn write<P: AsRef<Path>>(&self, report: &PackageReport, output_file: P) -> Result<()> {
        let output_file = output_file.as_ref();
        info!("Writing package report to: {}", output_file.display());

        let content = Self::format_as_env_file(report);
        self.fs_utils
            .write_file(output_file, content.as_bytes())
            .map_err(|e| RecipeError::file_system("write", output_file.to_path_buf(), e))?;

        debug!("Written report: {:?}", report);
        Ok(())
    }

    fn format_as_env_file(report: &PackageReport) -> String {
        format!(
            r#"PACKAGE_NAME={}
VERSION={}
PACKAGE_ID={}
OPTIONS="{}"
DEPENDENCIES="{}"
BUILD_DATE={}
"#,
            report.package_name,
            report.version,
            report.package_id,
            report.options,
            report.dependencies,
            report.build_date
        )
    }

    /// Load a report from an existing file
    #[instrument(skip(self, file_path))]
    pub fn load_from_file<P: AsRef<Path>>(&self, file_path: P) -> Result<PackageReport> {
        let file_path = file_path.as_ref();
        debug!("Loading package report from: {}", file_path.display());

        let content = self
            .fs_utils
            .read_file_to_string(file_path)
            .map_err(|e| RecipeError::file_system("read", file_path.to_path_buf(), e))?;

        Self::parse_env_content(&content)
    }

    fn parse_env_content(content: &str) -> Result<PackageReport> {
        let mut env_vars = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                env_vars.insert(key.trim(), value.trim().trim_matches('"'));
            }
        }

        let required = |key: &str| -> Result<String> {
            env_vars
                .get(key)
                .map(|value| (*value).to_string())
                .ok_or_else(|| RecipeError::validation(format!("package report lacks {key}")))
        };

        Ok(PackageReport {
            package_name: required("PACKAGE_NAME")?,
            version: required("VERSION")?,
            package_id: required("PACKAGE_ID")?,
            options: env_vars.get("OPTIONS").copied().unwrap_or_default().to_string(),
            dependencies: env_vars
                .get("DEPENDENCIES")
                .copied()
                .unwrap_or_default()
                .to_string(),
            build_date: required("BUILD_DATE")?,
        })
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable utilities
#[derive(Debug)]
pub struct EnvUtils;

impl EnvUtils {
    /// Whether the environment asks for packaging only (no tests)
    pub fn packaging_only() -> bool {
        Self::is_on(env::var(PACKAGING_ENV).ok().as_deref())
    }

    /// Interpret a toggle value; only `ON` enables it
    pub fn is_on(value: Option<&str>) -> bool {
        value.is_some_and(|v| v.trim() == "ON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_report() -> PackageReport {
        PackageReport {
            package_name: "logr".to_string(),
            version: "0.7.0".to_string(),
            package_id: "abc123".to_string(),
            options: "spdlog_backend=True glog_backend=False".to_string(),
            dependencies: "fmt/10.1.1 spdlog/1.12.0".to_string(),
            build_date: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_format_as_env_file() {
        let content = ReportWriter::format_as_env_file(&create_test_report());

        assert!(content.contains("PACKAGE_NAME=logr"));
        assert!(content.contains("VERSION=0.7.0"));
        assert!(content.contains("PACKAGE_ID=abc123"));
        assert!(content.contains("OPTIONS=\"spdlog_backend=True glog_backend=False\""));
        assert!(content.contains("DEPENDENCIES=\"fmt/10.1.1 spdlog/1.12.0\""));
    }

    #[test]
    fn test_write_and_load() {
        let writer = ReportWriter::new();
        let temp_file = NamedTempFile::new().unwrap();
        let report = create_test_report();

        writer.write(&report, temp_file.path()).unwrap();
        let loaded = writer.load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_load_rejects_incomplete_report() {
        let err = ReportWriter::parse_env_content("PACKAGE_NAME=logr\n").unwrap_err();
        assert!(err.to_string().contains("VERSION"));
    }

    #[test]
    fn test_toggle_values() {
        assert!(EnvUtils::is_on(Some("ON")));
        assert!(!EnvUtils::is_on(Some("OFF")));
        assert!(!EnvUtils::is_on(Some("on")));
        assert!(!EnvUtils::is_on(None));
    }
}
