//! Package version detection
//!
//! Reads the package version from the `LOGR_VERSION_*` macros of the
//! library's version header without compiling anything.

use crate::error::{RecipeError, Result};
use regex::Regex;
use semver::Version;
use std::path::Path;
use tracing::{debug, instrument};

/// Extracts `major.minor.patch` from a version header
pub struct VersionDetector {
    re_major: Regex,
    re_minor: Regex,
    re_patch: Regex,
}

impl VersionDetector {
    /// Create a new detector
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_major: Self::component_regex("MAJOR")?,
            re_minor: Self::component_regex("MINOR")?,
            re_patch: Self::component_regex("PATCH")?,
        })
    }

    fn component_regex(component: &str) -> Result<Regex> {
        Regex::new(&format!(r"VERSION_{component}\s+(\d+)ull"))
            .map_err(|e| RecipeError::validation(format!("Failed to compile regex: {e}")))
    }

    /// Detect the version from a header file
    #[instrument(skip(self))]
    pub fn detect<P: AsRef<Path> + std::fmt::Debug>(&self, path: P) -> Result<Version> {
        let path = path.as_ref();
        debug!("Reading version header: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|e| RecipeError::file_system("read", path.to_path_buf(), e))?;

        self.parse(&content).ok_or_else(|| {
            RecipeError::version_detection(
                format!("cannot detect version from {}", path.display()),
                path,
            )
        })
    }

    /// Parse header content, `None` if any component is missing
    pub fn parse(&self, content: &str) -> Option<Version> {
        let major = Self::capture(&self.re_major, content)?;
        let minor = Self::capture(&self.re_minor, content)?;
        let patch = Self::capture(&self.re_patch, content)?;

        let version = Version::new(major, minor, patch);
        debug!("Detected version {}", version);
        Some(version)
    }

    fn capture(regex: &Regex, content: &str) -> Option<u64> {
        regex
            .captures(content)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    const HEADER: &str = r#"
#pragma once

#define LOGR_VERSION_CODE( major, minor, patch ) \
    ( ( ( major ) << 16UL ) + ( ( minor ) << 8UL ) + ( ( patch ) << 0UL ))

#define LOGR_VERSION_MAJOR 0ull
#define LOGR_VERSION_MINOR 7ull
#define LOGR_VERSION_PATCH 12ull
"#;

    #[test]
    fn test_parse_header() {
        let detector = VersionDetector::new().unwrap();
        assert_eq!(detector.parse(HEADER), Some(Version::new(0, 7, 12)));
    }

    #[test]
    fn test_missing_component() {
        let detector = VersionDetector::new().unwrap();
        let content = HEADER.replace("#define LOGR_VERSION_PATCH 12ull", "");
        assert_eq!(detector.parse(&content), None);
    }

    #[test]
    fn test_detect_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), HEADER).unwrap();
        let detector = VersionDetector::new().unwrap();
        assert_eq!(detector.detect(file.path()).unwrap(), Version::new(0, 7, 12));
    }

    #[test]
    fn test_detect_reports_unparsable_header() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "#pragma once\n").unwrap();
        let detector = VersionDetector::new().unwrap();
        let err = detector.detect(file.path()).unwrap_err();
        assert!(matches!(err, RecipeError::VersionDetection { .. }));
    }
}
