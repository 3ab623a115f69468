//! File system utility functions
//!
//! Provides the file operations the install step and report writer need,
//! with proper error handling.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Header extensions counted as installed package contents
const HEADER_EXTENSIONS: [&str; 3] = ["hpp", "h", "ipp"];

/// Utility struct for file system operations
#[derive(Debug)]
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// Create a new file system utilities instance
    pub fn new() -> Self {
        Self
    }

    /// Create directories recursively
    #[instrument(skip(self))]
    pub fn create_dir_all<P: AsRef<Path> + std::fmt::Debug>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        debug!("Creating directory: {}", path.display());
        fs::create_dir_all(path)
    }

    /// Remove a directory and all its contents if it exists
    #[instrument(skip(self))]
    pub fn remove_dir_all_if_exists<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
    ) -> io::Result<bool> {
        let path = path.as_ref();

        match fs::remove_dir_all(path) {
            Ok(()) => {
                debug!("Removed directory: {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Directory does not exist: {}", path.display());
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove a directory only if it is empty; returns whether it was removed
    pub fn remove_dir_if_empty<P: AsRef<Path>>(&self, path: P) -> io::Result<bool> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Ok(false);
        }
        if fs::read_dir(path)?.next().is_some() {
            return Ok(false);
        }
        fs::remove_dir(path)?;
        debug!("Removed empty directory: {}", path.display());
        Ok(true)
    }

    /// Check if a path exists and is a directory
    pub fn is_dir<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().is_dir()
    }

    /// Find header files below `root`, sorted for consistent output
    #[instrument(skip(self))]
    pub fn find_headers<P: AsRef<Path> + std::fmt::Debug>(&self, root: P) -> Vec<PathBuf> {
        let root = root.as_ref();
        let mut headers = Vec::new();

        for ext in HEADER_EXTENSIONS {
            let pattern = format!("{}/**/*.{ext}", root.display());
            match glob::glob(&pattern) {
                Ok(paths) => {
                    for path_result in paths {
                        match path_result {
                            Ok(path) => headers.push(path),
                            Err(e) => warn!("Error reading header path: {}", e),
                        }
                    }
                }
                Err(e) => warn!("Invalid glob pattern {}: {}", pattern, e),
            }
        }

        headers.sort();
        debug!("Found {} headers under {}", headers.len(), root.display());
        headers
    }

    /// Write content to a file, creating parent directories if needed
    #[instrument(skip(self, contents))]
    pub fn write_file<P: AsRef<Path> + std::fmt::Debug, C: AsRef<[u8]>>(
        &self,
        path: P,
        contents: C,
    ) -> io::Result<()> {
        let path = path.as_ref();

        debug!("Writing file: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }

        fs::write(path, contents)?;
        debug!("File written successfully");
        Ok(())
    }

    /// Read file contents as string
    #[instrument(skip(self))]
    pub fn read_file_to_string<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
    ) -> io::Result<String> {
        let path = path.as_ref();
        debug!("Reading file: {}", path.display());
        fs::read_to_string(path)
    }
}

impl Default for FileSystemUtils {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_create_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let fs_utils = FileSystemUtils::new();

        let nested_path = temp_dir.path().join("a").join("b").join("c");

        fs_utils.create_dir_all(&nested_path).unwrap();
        assert!(fs_utils.is_dir(&nested_path));
    }

    #[test]
    fn test_remove_dir_all_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let fs_utils = FileSystemUtils::new();

        let cmake_dir = temp_dir.path().join("lib").join("cmake").join("logr");
        assert!(!fs_utils.remove_dir_all_if_exists(&cmake_dir).unwrap());

        fs::create_dir_all(&cmake_dir).unwrap();
        fs::write(cmake_dir.join("logr-config.cmake"), "").unwrap();
        assert!(
            fs_utils
                .remove_dir_all_if_exists(temp_dir.path().join("lib").join("cmake"))
                .unwrap()
        );
        assert!(!temp_dir.path().join("lib").join("cmake").exists());
    }

    #[test]
    fn test_remove_dir_if_empty() {
        let temp_dir = TempDir::new().unwrap();
        let fs_utils = FileSystemUtils::new();

        let dir = temp_dir.path().join("lib");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("keep.txt"), "x").unwrap();
        assert!(!fs_utils.remove_dir_if_empty(&dir).unwrap());

        fs::remove_file(dir.join("keep.txt")).unwrap();
        assert!(fs_utils.remove_dir_if_empty(&dir).unwrap());
        assert!(!dir.exists());
    }

    #[test]
    fn test_find_headers() {
        let temp_dir = TempDir::new().unwrap();
        let fs_utils = FileSystemUtils::new();

        let include = temp_dir.path().join("include").join("logr");
        fs::create_dir_all(&include).unwrap();
        fs::write(include.join("logr.hpp"), "").unwrap();
        fs::write(include.join("version.hpp"), "").unwrap();
        fs::write(include.join("README.md"), "").unwrap();

        let headers = fs_utils.find_headers(temp_dir.path().join("include"));
        assert_eq!(headers.len(), 2);
        assert!(headers[0].ends_with("logr.hpp"));
    }

    #[test]
    fn test_write_and_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let fs_utils = FileSystemUtils::new();

        let file_path = temp_dir.path().join("subdir").join("test.txt");
        let content = "Hello, world!";

        fs_utils.write_file(&file_path, content).unwrap();
        let read_content = fs_utils.read_file_to_string(&file_path).unwrap();

        assert_eq!(content, read_content);
    }
}
