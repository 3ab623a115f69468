//! CMake build system driver
//!
//! Configures, builds, tests and installs the library with CMake, passing the
//! emitted build configuration as cache definitions.

use crate::{
    config::Config,
    core::lifecycle::{BuildSystem, ResolutionPlan},
    error::{RecipeError, Result},
    utils::{fs::FileSystemUtils, process::ProcessRunner},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Runs the downstream CMake build for a resolution plan
pub struct CMakeBuilder {
    source_dir: PathBuf,
    build_dir: PathBuf,
    cmake: String,
    ctest: String,
    jobs: Option<u32>,
    /// Remove the binary directory before configuring
    clean: bool,
    build_type: String,
    process_runner: ProcessRunner,
    fs_utils: FileSystemUtils,
}

impl CMakeBuilder {
    /// Create a builder from the configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            source_dir: config.recipe_dir.clone(),
            build_dir: config.build.build_dir.clone(),
            cmake: config.build.cmake.clone(),
            ctest: config.build.ctest.clone(),
            jobs: config.build.jobs,
            clean: config.build.clean,
            build_type: config.toolchain.build_type.as_str().to_string(),
            process_runner: ProcessRunner::new(config.debug),
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Fail early if CMake is not on PATH
    pub fn ensure_available(&self) -> Result<()> {
        if !self.process_runner.command_exists(&self.cmake) {
            return Err(RecipeError::build(
                "configure",
                format!(
                    "{} not found\n\n\
                     CMake is required to build and install the package.\n\
                     Install CMake and ensure it's in your PATH.",
                    self.cmake
                ),
            ));
        }

        let output = self
            .process_runner
            .run_command_with_output(&self.cmake, &["--version"])
            .map_err(|e| RecipeError::build_with_source("configure", "cmake --version failed", e))?;
        info!("Using {}", output.first_line());
        Ok(())
    }

    /// Remove the binary directory of an earlier configure
    pub fn clean_build_dir(&self) -> Result<()> {
        let removed = self
            .fs_utils
            .remove_dir_all_if_exists(&self.build_dir)
            .map_err(|e| RecipeError::file_system("remove", self.build_dir.clone(), e))?;
        if removed {
            info!("Cleaned {}", self.build_dir.display());
        }
        Ok(())
    }

    fn path_arg(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    /// Arguments of the configure step
    fn configure_args(&self, plan: &ResolutionPlan) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            Self::path_arg(&self.source_dir),
            "-B".to_string(),
            Self::path_arg(&self.build_dir),
            format!("-DCMAKE_BUILD_TYPE={}", self.build_type),
        ];
        args.extend(plan.configuration.to_cmake_args());
        args
    }

    fn build_env(&self) -> Vec<(String, String)> {
        self.jobs
            .map(|jobs| vec![("CMAKE_BUILD_PARALLEL_LEVEL".to_string(), jobs.to_string())])
            .unwrap_or_default()
    }

    fn run(&self, stage: &str, program: &str, args: &[String]) -> Result<()> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.process_runner
            .run_command_with_env(program, &args, &self.build_env())
            .map_err(|e| RecipeError::build_with_source(stage, format!("{program} failed"), e))
    }
}

impl BuildSystem for CMakeBuilder {
    #[instrument(skip(self, plan))]
    fn configure(&mut self, plan: &ResolutionPlan) -> Result<()> {
        self.ensure_available()?;
        if self.clean {
            self.clean_build_dir()?;
        }
        info!("Configuring {} in {}", plan.package, self.build_dir.display());
        let args = self.configure_args(plan);
        debug!("Configure arguments: {:?}", args);
        self.run("configure", &self.cmake, &args)
    }

    #[instrument(skip(self))]
    fn build(&mut self) -> Result<()> {
        info!("Building tests, examples and benchmarks");
        let args = vec![
            "--build".to_string(),
            Self::path_arg(&self.build_dir),
            "--config".to_string(),
            self.build_type.clone(),
        ];
        self.run("build", &self.cmake, &args)
    }

    #[instrument(skip(self))]
    fn test(&mut self) -> Result<()> {
        info!("Running tests");
        let args = [
            "--test-dir".to_string(),
            Self::path_arg(&self.build_dir),
            "--output-on-failure".to_string(),
            "-C".to_string(),
            self.build_type.clone(),
        ];
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.process_runner
            .run_command_with_env(&self.ctest, &args, &self.build_env())
            .map_err(|e| RecipeError::test_with_source("ctest reported failures", e))
    }

    #[instrument(skip(self))]
    fn install(&mut self, package_dir: &Path) -> Result<()> {
        info!("Installing into {}", package_dir.display());
        let args = vec![
            "--install".to_string(),
            Self::path_arg(&self.build_dir),
            "--prefix".to_string(),
            Self::path_arg(package_dir),
            "--config".to_string(),
            self.build_type.clone(),
        ];
        self.run("install", &self.cmake, &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::{PlanRequest, resolve_plan};
    use crate::core::options::{Backend, OptionSet};
    use crate::core::registry::Registry;
    use semver::Version;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.recipe_dir = PathBuf::from("/src/logr");
        config.build.build_dir = PathBuf::from("/tmp/logr-build");
        config.build.jobs = Some(4);
        config
    }

    #[test]
    fn test_configure_args_carry_configuration() {
        let config = create_test_config();
        let builder = CMakeBuilder::new(&config);
        let request = PlanRequest {
            version: Version::new(0, 7, 0),
            options: OptionSet::default().with(Backend::Glog, false),
            toolchain: config.toolchain.clone(),
            test_mode: false,
        };
        let plan = resolve_plan(Registry::current(), &request).unwrap();

        let args = builder.configure_args(&plan);
        assert_eq!(&args[..4], &["-S", "/src/logr", "-B", "/tmp/logr-build"]);
        assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
        assert!(args.contains(&"-DLOGR_WITH_GLOG_BACKEND=OFF".to_string()));
        assert!(args.contains(&"-DLOGR_BUILD_TESTS=OFF".to_string()));
    }

    #[test]
    fn test_parallel_level_env() {
        let builder = CMakeBuilder::new(&create_test_config());
        assert_eq!(
            builder.build_env(),
            vec![("CMAKE_BUILD_PARALLEL_LEVEL".to_string(), "4".to_string())]
        );
    }

    #[test]
    fn test_clean_build_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = create_test_config();
        config.build.build_dir = temp_dir.path().join("build");
        std::fs::create_dir_all(config.build.build_dir.join("CMakeFiles")).unwrap();

        let builder = CMakeBuilder::new(&config);
        builder.clean_build_dir().unwrap();
        assert!(!config.build.build_dir.exists());
        // nothing left to remove
        builder.clean_build_dir().unwrap();
    }

    #[test]
    fn test_missing_cmake_is_build_error() {
        let mut config = create_test_config();
        config.build.cmake = "nonexistent_cmake_12345".to_string();
        let builder = CMakeBuilder::new(&config);
        let err = builder.ensure_available().unwrap_err();
        assert!(matches!(err, RecipeError::Build { .. }));
    }
}
