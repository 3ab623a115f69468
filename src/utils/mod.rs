//! Utility modules for common functionality
//!
//! Provides reusable utilities for file operations, process execution,
//! and environment handling.

pub mod env;
pub mod fs;
pub mod process;

pub use env::{EnvUtils, PackageReport, ReportWriter};
pub use fs::FileSystemUtils;
pub use process::{CapturedOutput, ProcessRunner};
