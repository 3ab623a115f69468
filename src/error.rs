//! Error types for the recipe resolver
//!
//! Provides structured error handling with context and proper error chains.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the recipe resolver
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Unregistered option flag or malformed option value
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Language standard or compiler version requirement unmet
    #[error("Incompatible toolchain {toolchain}: {message}")]
    IncompatibleToolchain {
        toolchain: String,
        message: String,
    },

    /// Errors reading the package version from the sources
    #[error("Version detection error: {message}")]
    VersionDetection { message: String, path: PathBuf },

    /// Downstream build failure
    #[error("Build error during {stage}: {message}")]
    Build {
        stage: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Downstream test failure
    #[error("Test error: {message}")]
    Test {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Errors related to package installation
    #[error("Install error: {message}")]
    Install { message: String, path: PathBuf },

    /// File system operation errors
    #[error("File system error: {operation} failed on {path}")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Process execution errors
    #[error("Process error: {command} failed")]
    Process {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl RecipeError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new incompatible toolchain error
    pub fn incompatible_toolchain(
        toolchain: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::IncompatibleToolchain {
            toolchain: toolchain.into(),
            message: message.into(),
        }
    }

    /// Create a new version detection error
    pub fn version_detection<P: Into<PathBuf>>(message: impl Into<String>, path: P) -> Self {
        Self::VersionDetection {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a new build error for the given stage
    pub fn build(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Build {
            stage: stage.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a new build error wrapping an underlying failure
    pub fn build_with_source(
        stage: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Build {
            stage: stage.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new test error
    pub fn test(message: impl Into<String>) -> Self {
        Self::Test {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new test error wrapping an underlying failure
    pub fn test_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Test {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new install error
    pub fn install<P: Into<PathBuf>>(message: impl Into<String>, path: P) -> Self {
        Self::Install {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new process error
    pub fn process(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Process {
            command: command.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error stops the pipeline before dependency resolution
    pub fn is_pre_resolution(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::IncompatibleToolchain { .. }
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RecipeError>;
