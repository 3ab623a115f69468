//! Configuration management for the recipe resolver
//!
//! Centralizes configuration options and provides validation.

use crate::{
    cli::{Args, Command},
    core::{
        options::OptionSet,
        toolchain::{
            CompilerFamily, CppStandard, Runtime, StdLib, ToolchainDescriptor,
            parse_compiler_version,
        },
    },
    error::RecipeError,
    utils::env::EnvUtils,
};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Root of the recipe sources (holds `CMakeLists.txt` and `logr/`)
    pub recipe_dir: PathBuf,
    /// Active backend options
    pub options: OptionSet,
    /// Toolchain the package is resolved for
    pub toolchain: ToolchainDescriptor,
    /// Build and run tests, examples and benchmarks
    pub test_mode: bool,
    /// Build configuration
    pub build: BuildConfig,
    /// Package output configuration
    pub package: PackageConfig,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// CMake executable
    pub cmake: String,
    /// CTest executable
    pub ctest: String,
    /// CMake binary directory
    pub build_dir: PathBuf,
    /// Parallel build jobs
    pub jobs: Option<u32>,
    /// Remove the build directory before configuring
    pub clean: bool,
}

/// Package output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Install prefix of the package
    pub package_dir: PathBuf,
    /// Report file written after a successful run
    pub report_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            recipe_dir: PathBuf::from("."),
            options: OptionSet::default(),
            toolchain: ToolchainDescriptor::new(CompilerFamily::Gcc, Version::new(12, 0, 0)),
            test_mode: true,
            build: BuildConfig::default(),
            package: PackageConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cmake: "cmake".to_string(),
            ctest: "ctest".to_string(),
            build_dir: PathBuf::from("build"),
            jobs: None,
            clean: false,
        }
    }
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            package_dir: PathBuf::from("package"),
            report_file: PathBuf::from("package.env"),
        }
    }
}

impl Config {
    /// Create configuration from command line arguments and the environment
    pub fn from_args(args: &Args) -> Result<Self, RecipeError> {
        let tc = &args.toolchain;
        let mut toolchain = ToolchainDescriptor::new(
            tc.compiler.parse()?,
            parse_compiler_version(&tc.compiler_version)?,
        );
        toolchain.libcxx = tc.libcxx.as_deref().map(str::parse::<StdLib>).transpose()?;
        toolchain.cppstd = tc.cppstd.as_deref().map(str::parse::<CppStandard>).transpose()?;
        toolchain.runtime = tc.runtime.as_deref().map(str::parse::<Runtime>).transpose()?;
        toolchain.build_type = tc.build_type.parse()?;

        let mut config = Self {
            debug: args.debug,
            recipe_dir: args.recipe_dir.clone(),
            options: OptionSet::from_overrides(&args.options)?,
            toolchain,
            test_mode: !(args.package_only || EnvUtils::packaging_only()),
            ..Self::default()
        };

        // Override with command-specific options
        if let Command::Create {
            build_dir,
            package_dir,
            jobs,
            clean,
        } = &args.command
        {
            config.build.build_dir = build_dir.clone();
            config.build.jobs = *jobs;
            config.build.clean = *clean;
            config.package.package_dir = package_dir.clone();
            config.package.report_file = package_dir.join("package.env");
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), RecipeError> {
        if !self.recipe_dir.exists() {
            return Err(RecipeError::validation(format!(
                "Recipe directory not found: {}",
                self.recipe_dir.display()
            )));
        }

        if self.build.jobs == Some(0) {
            return Err(RecipeError::validation("--jobs must be at least 1"));
        }

        if self.build.build_dir == self.package.package_dir {
            return Err(RecipeError::validation(format!(
                "Build and package directories must differ: {}",
                self.build.build_dir.display()
            )));
        }

        // the package directory is cleared before install
        if let (Ok(recipe), Ok(package)) = (
            self.recipe_dir.canonicalize(),
            self.package.package_dir.canonicalize(),
        ) {
            if recipe.starts_with(&package) {
                return Err(RecipeError::validation(format!(
                    "Package directory must not contain the recipe sources: {}",
                    self.package.package_dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Path of the version header inside the recipe sources
    pub fn version_header(&self, relative: &str) -> PathBuf {
        self.recipe_dir.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::Backend;
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(extra: &[&str], dir: &TempDir) -> Result<Config, RecipeError> {
        let mut argv = vec!["recipe", "--recipe-dir", dir.path().to_str().unwrap()];
        argv.extend_from_slice(extra);
        Config::from_args(&Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.toolchain.family, CompilerFamily::Gcc);
        assert_eq!(config.options, OptionSet::default());
        assert_eq!(config.package.report_file, PathBuf::from("package.env"));
    }

    #[test]
    fn test_from_args_builds_toolchain_and_options() {
        let dir = TempDir::new().unwrap();
        let config = parse(
            &[
                "--compiler",
                "clang",
                "--compiler-version",
                "15",
                "--libcxx",
                "libc++",
                "--cppstd",
                "20",
                "-o",
                "glog_backend=False",
                "validate",
            ],
            &dir,
        )
        .unwrap();

        assert_eq!(config.toolchain.family, CompilerFamily::Clang);
        assert_eq!(config.toolchain.version, Version::new(15, 0, 0));
        assert_eq!(config.toolchain.libcxx, Some(StdLib::Libcxx));
        assert_eq!(config.toolchain.cppstd, Some(CppStandard::Cpp20));
        assert!(!config.options.is_enabled(Backend::Glog));
    }

    #[test]
    fn test_unknown_option_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let err = parse(&["-o", "syslog_backend=True", "validate"], &dir).unwrap_err();
        assert!(matches!(err, RecipeError::Configuration { .. }));
    }

    #[test]
    fn test_package_only_disables_tests() {
        let dir = TempDir::new().unwrap();
        let config = parse(&["--package-only", "validate"], &dir).unwrap();
        assert!(!config.test_mode);
    }

    #[test]
    fn test_create_overrides_directories() {
        let dir = TempDir::new().unwrap();
        let config = parse(
            &["create", "--build-dir", "out/build", "--package-dir", "out/pkg"],
            &dir,
        )
        .unwrap();
        assert_eq!(config.build.build_dir, PathBuf::from("out/build"));
        assert_eq!(config.package.report_file, PathBuf::from("out/pkg/package.env"));
    }

    #[test]
    fn test_missing_recipe_dir_fails_validation() {
        let config = Config {
            recipe_dir: PathBuf::from("/nonexistent/recipe/dir"),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RecipeError::Validation { .. })
        ));
    }

    #[test]
    fn test_package_dir_must_not_contain_recipe() {
        let dir = TempDir::new().unwrap();
        let recipe = dir.path().join("sources");
        std::fs::create_dir(&recipe).unwrap();

        let mut config = Config {
            recipe_dir: recipe,
            ..Config::default()
        };
        config.package.package_dir = dir.path().to_path_buf();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must not contain the recipe sources"));
    }
}
