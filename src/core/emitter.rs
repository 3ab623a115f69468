//! Build configuration emission
//!
//! Produces the variables handed to the downstream build system. Nothing in
//! here runs the build system itself.

use crate::core::options::OptionSet;
use crate::core::registry::Registry;
use crate::core::toolchain::{BuildType, Runtime, ToolchainDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

pub const INSTALL_VAR: &str = "LOGR_INSTALL";
pub const BUILD_TESTS_VAR: &str = "LOGR_BUILD_TESTS";
pub const BUILD_EXAMPLES_VAR: &str = "LOGR_BUILD_EXAMPLES";
pub const BUILD_BENCHMARK_VAR: &str = "LOGR_BUILD_BENCHMARK";
pub const STDLIB_VAR: &str = "LOGR_CXX_STDLIB";
pub const MSVC_RUNTIME_VAR: &str = "CMAKE_MSVC_RUNTIME_LIBRARY";

/// Toggles that follow the test mode together
pub const TEST_MODE_VARS: [&str; 3] = [BUILD_TESTS_VAR, BUILD_EXAMPLES_VAR, BUILD_BENCHMARK_VAR];

/// Value of a build system variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Str(String),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("ON"),
            Self::Bool(false) => f.write_str("OFF"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

/// Variables for one configure run of the build system
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    variables: BTreeMap<String, ConfigValue>,
}

impl BuildConfiguration {
    fn set(&mut self, name: &str, value: ConfigValue) {
        debug!("{} = {}", name, value);
        self.variables.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.variables.get(name)
    }

    /// Boolean value of a toggle, `None` if unset or not a toggle
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.variables.get(name) {
            Some(ConfigValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Cache definitions in `-DNAME=VALUE` form
    pub fn to_cmake_args(&self) -> Vec<String> {
        self.iter()
            .map(|(name, value)| format!("-D{name}={value}"))
            .collect()
    }
}

/// MSVC runtime library name for a runtime mode and build type
fn msvc_runtime_library(runtime: Runtime, build_type: BuildType) -> String {
    let debug = if build_type == BuildType::Debug { "Debug" } else { "" };
    match runtime {
        Runtime::Static => format!("MultiThreaded{debug}"),
        Runtime::Dynamic => format!("MultiThreaded{debug}DLL"),
    }
}

/// Emit the build configuration for a resolved option set
///
/// Backend toggles mirror `options` one to one. The three test toggles all
/// take the value of `test_mode`. Toolchain flags are only added for the
/// compiler families that understand them.
#[instrument(skip(registry))]
pub fn emit(
    registry: &Registry,
    options: &OptionSet,
    toolchain: &ToolchainDescriptor,
    test_mode: bool,
) -> BuildConfiguration {
    let mut config = BuildConfiguration::default();

    config.set(INSTALL_VAR, ConfigValue::Bool(true));
    for name in TEST_MODE_VARS {
        config.set(name, ConfigValue::Bool(test_mode));
    }

    for entry in registry.backends {
        config.set(
            entry.cmake_variable,
            ConfigValue::Bool(options.is_enabled(entry.backend)),
        );
    }

    if toolchain.family.selects_stdlib() {
        if let Some(libcxx) = toolchain.libcxx {
            config.set(STDLIB_VAR, ConfigValue::Str(libcxx.library_name().to_string()));
        }
    }

    if toolchain.family.selects_msvc_runtime() {
        if let Some(runtime) = toolchain.runtime {
            config.set(
                MSVC_RUNTIME_VAR,
                ConfigValue::Str(msvc_runtime_library(runtime, toolchain.build_type)),
            );
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::Backend;
    use crate::core::toolchain::{CompilerFamily, StdLib};
    use semver::Version;

    fn toolchain(family: CompilerFamily) -> ToolchainDescriptor {
        ToolchainDescriptor::new(family, Version::new(12, 0, 0))
    }

    #[test]
    fn test_all_backends_and_test_mode() {
        let config = emit(
            Registry::current(),
            &OptionSet::default(),
            &toolchain(CompilerFamily::Gcc),
            true,
        );
        for entry in Registry::current().backends {
            assert_eq!(config.flag(entry.cmake_variable), Some(true));
        }
        for name in TEST_MODE_VARS {
            assert_eq!(config.flag(name), Some(true));
        }
        assert_eq!(config.flag(INSTALL_VAR), Some(true));
        assert_eq!(config.len(), 8);
    }

    #[test]
    fn test_toggles_mirror_options() {
        let options = OptionSet::default()
            .with(Backend::Spdlog, false)
            .with(Backend::Boostlog, false);
        let config = emit(
            Registry::current(),
            &options,
            &toolchain(CompilerFamily::Gcc),
            false,
        );
        assert_eq!(config.flag("LOGR_WITH_SPDLOG_BACKEND"), Some(false));
        assert_eq!(config.flag("LOGR_WITH_GLOG_BACKEND"), Some(true));
        assert_eq!(config.flag("LOGR_WITH_LOG4CPLUS_BACKEND"), Some(true));
        assert_eq!(config.flag("LOGR_WITH_BOOSTLOG_BACKEND"), Some(false));
        for name in TEST_MODE_VARS {
            assert_eq!(config.flag(name), Some(false));
        }
    }

    #[test]
    fn test_stdlib_flag_only_for_clang_families() {
        let registry = Registry::current();
        let options = OptionSet::default();

        let clang = toolchain(CompilerFamily::Clang).with_libcxx(StdLib::Libcxx);
        let config = emit(registry, &options, &clang, false);
        assert_eq!(
            config.get(STDLIB_VAR),
            Some(&ConfigValue::Str("libc++".to_string()))
        );

        let apple = toolchain(CompilerFamily::AppleClang).with_libcxx(StdLib::Libstdcxx11);
        let config = emit(registry, &options, &apple, false);
        assert_eq!(
            config.get(STDLIB_VAR),
            Some(&ConfigValue::Str("libstdc++".to_string()))
        );

        let gcc = toolchain(CompilerFamily::Gcc).with_libcxx(StdLib::Libstdcxx11);
        assert!(emit(registry, &options, &gcc, false).get(STDLIB_VAR).is_none());
    }

    #[test]
    fn test_runtime_flag_only_for_msvc_families() {
        let registry = Registry::current();
        let options = OptionSet::default();

        let msvc = ToolchainDescriptor::new(CompilerFamily::Msvc, Version::new(193, 0, 0))
            .with_runtime(Runtime::Static);
        assert_eq!(
            emit(registry, &options, &msvc, false).get(MSVC_RUNTIME_VAR),
            Some(&ConfigValue::Str("MultiThreaded".to_string()))
        );

        let vs_debug = ToolchainDescriptor::new(CompilerFamily::VisualStudio, Version::new(17, 0, 0))
            .with_runtime(Runtime::Dynamic)
            .with_build_type(BuildType::Debug);
        assert_eq!(
            emit(registry, &options, &vs_debug, false).get(MSVC_RUNTIME_VAR),
            Some(&ConfigValue::Str("MultiThreadedDebugDLL".to_string()))
        );

        let clang = toolchain(CompilerFamily::Clang).with_runtime(Runtime::Static);
        assert!(emit(registry, &options, &clang, false).get(MSVC_RUNTIME_VAR).is_none());
    }

    #[test]
    fn test_cmake_args_rendering() {
        let config = emit(
            Registry::current(),
            &OptionSet::default().with(Backend::Glog, false),
            &toolchain(CompilerFamily::Gcc),
            false,
        );
        let args = config.to_cmake_args();
        assert!(args.contains(&"-DLOGR_WITH_GLOG_BACKEND=OFF".to_string()));
        assert!(args.contains(&"-DLOGR_INSTALL=ON".to_string()));
        assert!(args.contains(&"-DLOGR_BUILD_TESTS=OFF".to_string()));
    }
}
