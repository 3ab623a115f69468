//! Version and compatibility registry
//!
//! Static tables only: minimum compiler versions, the mandatory base
//! dependency, the per-backend dependency coordinates and the test-only
//! requirements. Lookups are the only behavior.

use crate::core::options::Backend;
use crate::core::toolchain::{CppStandard, ToolchainDescriptor};
use semver::Version;
use serde::Serialize;

/// Descriptive package metadata published alongside the recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: &'static str,
    pub license: &'static str,
    pub author: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub topics: &'static [&'static str],
    /// Header holding the `LOGR_VERSION_*` macros, relative to the recipe root
    #[serde(skip)]
    pub version_header: &'static str,
}

/// Minimum supported version of a compiler family
#[derive(Debug)]
pub struct CompilerMinimum {
    pub family: &'static str,
    pub version: Version,
}

/// How the pinned version of a dependency is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinRule {
    /// Always the same version
    Exact(Version),
    /// Use `newer` unless the toolchain is `family` at or below `threshold`
    ToolchainGated {
        family: &'static str,
        threshold: Version,
        newer: Version,
        older: Version,
    },
}

impl PinRule {
    /// Pick the pinned version for the given toolchain
    pub fn select(&self, toolchain: &ToolchainDescriptor) -> &Version {
        match self {
            Self::Exact(version) => version,
            Self::ToolchainGated {
                family,
                threshold,
                newer,
                older,
            } => {
                if toolchain.family.as_str() == *family && toolchain.version <= *threshold {
                    older
                } else {
                    newer
                }
            }
        }
    }
}

/// Upstream dependency coordinates
#[derive(Debug)]
pub struct DependencySpec {
    pub name: &'static str,
    pub pin: PinRule,
    /// Options forced on the dependency whenever it is required
    pub sub_options: &'static [(&'static str, &'static str)],
}

/// Everything the recipe knows about one backend
#[derive(Debug)]
pub struct BackendEntry {
    pub backend: Backend,
    pub dependency: DependencySpec,
    /// CMake toggle mirroring the option flag
    pub cmake_variable: &'static str,
    /// Imported target consumers link through the backend component
    pub component_target: &'static str,
}

/// The full registry for one recipe revision
#[derive(Debug)]
pub struct Registry {
    pub package: PackageMetadata,
    pub min_standard: CppStandard,
    pub compiler_minimums: &'static [CompilerMinimum],
    pub base: DependencySpec,
    /// Imported target of the base dependency
    pub base_target: &'static str,
    /// Backends in declaration order
    pub backends: &'static [BackendEntry],
    pub test_requirements: &'static [DependencySpec],
}

static COMPILER_MINIMUMS: [CompilerMinimum; 5] = [
    CompilerMinimum {
        family: "gcc",
        version: Version::new(9, 0, 0),
    },
    CompilerMinimum {
        family: "clang",
        version: Version::new(11, 0, 0),
    },
    CompilerMinimum {
        family: "apple-clang",
        version: Version::new(12, 0, 0),
    },
    CompilerMinimum {
        family: "Visual Studio",
        version: Version::new(17, 0, 0),
    },
    CompilerMinimum {
        family: "msvc",
        version: Version::new(191, 0, 0),
    },
];

static BACKENDS: [BackendEntry; 4] = [
    BackendEntry {
        backend: Backend::Spdlog,
        dependency: DependencySpec {
            name: "spdlog",
            pin: PinRule::Exact(Version::new(1, 12, 0)),
            // benchmarks compare backends with no exception catching in spdlog
            sub_options: &[("no_exceptions", "True")],
        },
        cmake_variable: "LOGR_WITH_SPDLOG_BACKEND",
        component_target: "spdlog::spdlog",
    },
    BackendEntry {
        backend: Backend::Glog,
        dependency: DependencySpec {
            name: "glog",
            pin: PinRule::Exact(Version::new(0, 6, 0)),
            sub_options: &[],
        },
        cmake_variable: "LOGR_WITH_GLOG_BACKEND",
        component_target: "glog::glog",
    },
    BackendEntry {
        backend: Backend::Log4cplus,
        dependency: DependencySpec {
            name: "log4cplus",
            pin: PinRule::Exact(Version::new(2, 1, 0)),
            sub_options: &[("unicode", "False")],
        },
        cmake_variable: "LOGR_WITH_LOG4CPLUS_BACKEND",
        component_target: "log4cplus::log4cplus",
    },
    BackendEntry {
        backend: Backend::Boostlog,
        dependency: DependencySpec {
            name: "boost",
            pin: PinRule::ToolchainGated {
                family: "gcc",
                threshold: Version::new(10, u64::MAX, u64::MAX),
                newer: Version::new(1, 83, 0),
                older: Version::new(1, 81, 0),
            },
            sub_options: &[],
        },
        cmake_variable: "LOGR_WITH_BOOSTLOG_BACKEND",
        component_target: "boost::log",
    },
];

static TEST_REQUIREMENTS: [DependencySpec; 2] = [
    DependencySpec {
        name: "gtest",
        pin: PinRule::Exact(Version::new(1, 14, 0)),
        sub_options: &[],
    },
    DependencySpec {
        name: "benchmark",
        pin: PinRule::Exact(Version::new(1, 8, 3)),
        sub_options: &[],
    },
];

/// Registry of the current recipe revision
pub static REGISTRY: Registry = Registry {
    package: PackageMetadata {
        name: "logr",
        license: "BSD 3-Clause License",
        author: "Nicolai Grodzitski <utromvecherom@gmail.com>",
        url: "https://github.com/ngrodzitski/logr",
        description: "Logger frontend substitution for spdlog, glog, etc for server/desktop applications",
        topics: &["logger", "development", "util", "utils"],
        version_header: "logr/include/logr/version.hpp",
    },
    min_standard: CppStandard::Cpp17,
    compiler_minimums: &COMPILER_MINIMUMS,
    base: DependencySpec {
        name: "fmt",
        pin: PinRule::Exact(Version::new(10, 1, 1)),
        sub_options: &[],
    },
    base_target: "fmt::fmt",
    backends: &BACKENDS,
    test_requirements: &TEST_REQUIREMENTS,
};

impl Registry {
    /// Registry of the current recipe revision
    pub fn current() -> &'static Self {
        &REGISTRY
    }

    /// Minimum supported version for a compiler family, if registered
    pub fn minimum_compiler_version(&self, family: &str) -> Option<&Version> {
        self.compiler_minimums
            .iter()
            .find(|entry| entry.family == family)
            .map(|entry| &entry.version)
    }

    /// Registry entry of a backend
    pub fn backend(&self, backend: Backend) -> Option<&BackendEntry> {
        self.backends.iter().find(|entry| entry.backend == backend)
    }
}
