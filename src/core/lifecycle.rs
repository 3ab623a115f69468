//! Lifecycle orchestration
//!
//! Sequences one resolution pass:
//! `Init -> Validate -> ResolveDependencies -> EmitConfiguration ->
//! [BuildAndTest] -> Install -> ComputeIdentity -> Done`.
//! Any failure moves the pipeline to `Aborted` and no later stage runs.

use crate::core::emitter::{BuildConfiguration, emit};
use crate::core::identity::{PackageIdentity, compute_identity};
use crate::core::options::OptionSet;
use crate::core::package_info::PackageInfo;
use crate::core::registry::{PackageMetadata, Registry};
use crate::core::resolver::{DependencyDeclaration, build_requirements, resolve};
use crate::core::toolchain::ToolchainDescriptor;
use crate::core::validator::{CompatibilityVerdict, validate};
use crate::error::{RecipeError, Result};
use crate::utils::fs::FileSystemUtils;
use semver::Version;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// Downstream build system driven by the pipeline
///
/// Calls are synchronous; each one completes before the next stage starts.
pub trait BuildSystem {
    /// Accept the emitted configuration
    fn configure(&mut self, plan: &ResolutionPlan) -> Result<()>;
    /// Compile tests, examples and benchmarks
    fn build(&mut self) -> Result<()>;
    /// Run the test suite
    fn test(&mut self) -> Result<()>;
    /// Install the package contents into `package_dir`
    fn install(&mut self, package_dir: &Path) -> Result<()>;
}

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Init,
    Validate,
    ResolveDependencies,
    EmitConfiguration,
    BuildAndTest,
    Install,
    ComputeIdentity,
    Done,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Inputs of one resolution pass
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub version: Version,
    pub options: OptionSet,
    pub toolchain: ToolchainDescriptor,
    /// Build and run tests, examples and benchmarks
    pub test_mode: bool,
}

/// Everything resolved for one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionPlan {
    pub package: String,
    pub version: Version,
    pub metadata: PackageMetadata,
    pub toolchain: ToolchainDescriptor,
    pub options: OptionSet,
    pub test_mode: bool,
    pub verdict: CompatibilityVerdict,
    pub requires: Vec<DependencyDeclaration>,
    pub build_requires: Vec<DependencyDeclaration>,
    pub configuration: BuildConfiguration,
    pub package_info: PackageInfo,
}

impl ResolutionPlan {
    /// Identity of the published artifact
    ///
    /// Only the package name and version contribute. Toolchain, options and
    /// test mode never change the identity.
    pub fn identity(&self) -> PackageIdentity {
        compute_identity(&self.package, &self.version)
    }
}

/// Result of a completed pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    pub plan: ResolutionPlan,
    pub identity: PackageIdentity,
    /// Installed headers, relative paths under the package folder
    pub headers: Vec<PathBuf>,
    pub tests_ran: bool,
}

/// Drives a single resolution pass and records the stages it entered
pub struct Pipeline<'a> {
    registry: &'a Registry,
    stages: Vec<Stage>,
    fs_utils: FileSystemUtils,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            stages: vec![Stage::Init],
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Stages entered so far, in order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Current stage
    pub fn state(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Init)
    }

    fn enter(&mut self, stage: Stage) {
        info!("Stage: {}", stage);
        self.stages.push(stage);
    }

    fn abort<T>(&mut self, err: RecipeError) -> Result<T> {
        if err.is_pre_resolution() {
            error!("Rejected before resolution: {}", err);
        } else {
            error!("Aborted during {}: {}", self.state(), err);
        }
        self.stages.push(Stage::Aborted);
        Err(err)
    }

    /// Validate, resolve dependencies and emit the build configuration
    #[instrument(skip_all, fields(toolchain = %request.toolchain))]
    pub fn plan(&mut self, request: &PlanRequest) -> Result<ResolutionPlan> {
        self.enter(Stage::Validate);
        let verdict = match validate(
            self.registry,
            &request.toolchain,
            self.registry.min_standard,
        ) {
            Ok(verdict) => verdict,
            Err(e) => return self.abort(e),
        };
        verdict.report();
        if let CompatibilityVerdict::Fail { reason } = &verdict {
            let err = RecipeError::incompatible_toolchain(request.toolchain.to_string(), reason);
            return self.abort(err);
        }

        self.enter(Stage::ResolveDependencies);
        let requires = resolve(self.registry, &request.options, &request.toolchain);
        let build_requires =
            build_requirements(self.registry, &request.toolchain, request.test_mode);
        info!(
            "Resolved {} requirement(s), {} test requirement(s)",
            requires.len(),
            build_requires.len()
        );

        self.enter(Stage::EmitConfiguration);
        let configuration = emit(
            self.registry,
            &request.options,
            &request.toolchain,
            request.test_mode,
        );

        Ok(ResolutionPlan {
            package: self.registry.package.name.to_string(),
            version: request.version.clone(),
            metadata: self.registry.package.clone(),
            toolchain: request.toolchain.clone(),
            options: request.options.clone(),
            test_mode: request.test_mode,
            verdict,
            requires,
            build_requires,
            configuration,
            package_info: PackageInfo::new(self.registry, &request.options),
        })
    }

    /// Run the whole lifecycle against a build system
    #[instrument(skip_all, fields(package_dir = %package_dir.display()))]
    pub fn run<B: BuildSystem>(
        &mut self,
        request: &PlanRequest,
        build_system: &mut B,
        package_dir: &Path,
    ) -> Result<PipelineOutcome> {
        let plan = self.plan(request)?;

        if let Err(e) = build_system.configure(&plan) {
            return self.abort(e);
        }

        if plan.test_mode {
            self.enter(Stage::BuildAndTest);
            if let Err(e) = build_system.build().and_then(|()| build_system.test()) {
                return self.abort(e);
            }
        } else {
            info!("Tests, examples and benchmarks skipped");
        }

        self.enter(Stage::Install);
        let headers = match self
            .clear_package_dir(package_dir)
            .and_then(|()| build_system.install(package_dir))
            .and_then(|()| self.finish_install(package_dir))
        {
            Ok(headers) => headers,
            Err(e) => return self.abort(e),
        };

        self.enter(Stage::ComputeIdentity);
        let identity = plan.identity();
        info!("Package identity: {}", identity);

        self.enter(Stage::Done);
        Ok(PipelineOutcome {
            tests_ran: plan.test_mode,
            plan,
            identity,
            headers,
        })
    }

    /// Drop contents of an earlier install so stale headers cannot pass the
    /// layout check
    fn clear_package_dir(&self, package_dir: &Path) -> Result<()> {
        if self
            .fs_utils
            .remove_dir_all_if_exists(package_dir)
            .map_err(|e| RecipeError::file_system("remove", package_dir, e))?
        {
            info!("Cleared previous package in {}", package_dir.display());
        }
        Ok(())
    }

    /// Strip build-system leftovers and check the package is headers only
    fn finish_install(&self, package_dir: &Path) -> Result<Vec<PathBuf>> {
        let lib_dir = package_dir.join("lib");
        self.fs_utils
            .remove_dir_all_if_exists(lib_dir.join("cmake"))
            .map_err(|e| RecipeError::file_system("remove", lib_dir.join("cmake"), e))?;
        self.fs_utils
            .remove_dir_if_empty(&lib_dir)
            .map_err(|e| RecipeError::file_system("remove", lib_dir.clone(), e))?;

        if self.fs_utils.is_dir(&lib_dir) {
            return Err(RecipeError::install(
                "package must not contain compiled libraries",
                lib_dir,
            ));
        }

        let headers: Vec<PathBuf> = self
            .fs_utils
            .find_headers(package_dir.join("include"))
            .into_iter()
            .map(|path| {
                path.strip_prefix(package_dir)
                    .map(Path::to_path_buf)
                    .unwrap_or(path)
            })
            .collect();

        if headers.is_empty() {
            return Err(RecipeError::install(
                "no headers were installed under include/",
                package_dir,
            ));
        }

        info!("Installed {} header(s)", headers.len());
        Ok(headers)
    }
}

/// Resolve a plan without running any build
pub fn resolve_plan(registry: &Registry, request: &PlanRequest) -> Result<ResolutionPlan> {
    Pipeline::new(registry).plan(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::toolchain::CompilerFamily;
    use std::fs;
    use tempfile::TempDir;

    /// Records calls and writes a fake install tree
    #[derive(Default)]
    struct RecordingBuild {
        calls: Vec<&'static str>,
        fail_tests: bool,
    }

    impl BuildSystem for RecordingBuild {
        fn configure(&mut self, _plan: &ResolutionPlan) -> Result<()> {
            self.calls.push("configure");
            Ok(())
        }

        fn build(&mut self) -> Result<()> {
            self.calls.push("build");
            Ok(())
        }

        fn test(&mut self) -> Result<()> {
            self.calls.push("test");
            if self.fail_tests {
                return Err(RecipeError::test("1 test failed"));
            }
            Ok(())
        }

        fn install(&mut self, package_dir: &Path) -> Result<()> {
            self.calls.push("install");
            let include = package_dir.join("include").join("logr");
            fs::create_dir_all(&include).unwrap();
            fs::write(include.join("logr.hpp"), "#pragma once\n").unwrap();
            let cmake = package_dir.join("lib").join("cmake").join("logr");
            fs::create_dir_all(&cmake).unwrap();
            fs::write(cmake.join("logr-config.cmake"), "").unwrap();
            Ok(())
        }
    }

    fn request(major: u64, test_mode: bool) -> PlanRequest {
        PlanRequest {
            version: Version::new(0, 7, 0),
            options: OptionSet::default(),
            toolchain: ToolchainDescriptor::new(CompilerFamily::Gcc, Version::new(major, 0, 0)),
            test_mode,
        }
    }

    #[test]
    fn test_full_run_with_tests() {
        let temp_dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(Registry::current());
        let mut build = RecordingBuild::default();

        let outcome = pipeline
            .run(&request(12, true), &mut build, temp_dir.path())
            .unwrap();

        assert_eq!(build.calls, vec!["configure", "build", "test", "install"]);
        assert_eq!(
            pipeline.stages(),
            &[
                Stage::Init,
                Stage::Validate,
                Stage::ResolveDependencies,
                Stage::EmitConfiguration,
                Stage::BuildAndTest,
                Stage::Install,
                Stage::ComputeIdentity,
                Stage::Done,
            ]
        );
        assert!(outcome.tests_ran);
        assert_eq!(outcome.headers, vec![PathBuf::from("include/logr/logr.hpp")]);
        assert!(!temp_dir.path().join("lib").exists());
    }

    #[test]
    fn test_install_replaces_previous_package() {
        let temp_dir = TempDir::new().unwrap();
        let stale = temp_dir.path().join("include").join("stale.hpp");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "").unwrap();

        let mut pipeline = Pipeline::new(Registry::current());
        let outcome = pipeline
            .run(&request(12, false), &mut RecordingBuild::default(), temp_dir.path())
            .unwrap();

        assert!(!stale.exists());
        assert_eq!(outcome.headers, vec![PathBuf::from("include/logr/logr.hpp")]);
    }

    #[test]
    fn test_failed_validation_keeps_previous_package() {
        let temp_dir = TempDir::new().unwrap();
        let previous = temp_dir.path().join("include").join("previous.hpp");
        fs::create_dir_all(previous.parent().unwrap()).unwrap();
        fs::write(&previous, "").unwrap();

        let mut pipeline = Pipeline::new(Registry::current());
        let mut build = RecordingBuild::default();
        assert!(
            pipeline
                .run(&request(5, true), &mut build, temp_dir.path())
                .is_err()
        );

        assert!(previous.exists());
        assert!(build.calls.is_empty());
    }

    #[test]
    fn test_install_runs_when_tests_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(Registry::current());
        let mut build = RecordingBuild::default();

        let outcome = pipeline
            .run(&request(12, false), &mut build, temp_dir.path())
            .unwrap();

        assert_eq!(build.calls, vec!["configure", "install"]);
        assert!(!pipeline.stages().contains(&Stage::BuildAndTest));
        assert_eq!(pipeline.state(), Stage::Done);
        assert!(!outcome.tests_ran);
    }

    #[test]
    fn test_failed_validation_aborts_before_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(Registry::current());
        let mut build = RecordingBuild::default();

        let err = pipeline
            .run(&request(5, true), &mut build, temp_dir.path())
            .unwrap_err();

        assert!(matches!(err, RecipeError::IncompatibleToolchain { .. }));
        assert!(build.calls.is_empty());
        assert_eq!(
            pipeline.stages(),
            &[Stage::Init, Stage::Validate, Stage::Aborted]
        );
    }

    #[test]
    fn test_test_failure_aborts_before_install() {
        let temp_dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(Registry::current());
        let mut build = RecordingBuild {
            fail_tests: true,
            ..Default::default()
        };

        let err = pipeline
            .run(&request(12, true), &mut build, temp_dir.path())
            .unwrap_err();

        assert!(matches!(err, RecipeError::Test { .. }));
        assert!(!build.calls.contains(&"install"));
        assert_eq!(pipeline.state(), Stage::Aborted);
        assert!(!pipeline.stages().contains(&Stage::Install));
    }

    #[test]
    fn test_plan_contents() {
        let plan = resolve_plan(Registry::current(), &request(12, true)).unwrap();
        assert_eq!(plan.package, "logr");
        assert_eq!(plan.metadata.license, "BSD 3-Clause License");
        assert_eq!(plan.metadata.url, "https://github.com/ngrodzitski/logr");
        assert_eq!(plan.verdict, CompatibilityVerdict::Pass);
        assert_eq!(plan.requires.len(), 5);
        assert_eq!(plan.build_requires.len(), 2);
        assert_eq!(plan.package_info.components.len(), 5);
    }
}
