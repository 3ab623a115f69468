//! Toolchain description
//!
//! Identifies the compiler family, version and standard library/runtime mode
//! the package is resolved for. Descriptors are supplied by the invoking
//! environment and never mutated during a resolution pass.

use crate::error::{RecipeError, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compiler family as named by the package manager settings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompilerFamily {
    Gcc,
    Clang,
    AppleClang,
    VisualStudio,
    Msvc,
    /// Any family the registry has no entry for
    Other(String),
}

impl CompilerFamily {
    /// Settings name of the family (e.g. `apple-clang`)
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::VisualStudio => "Visual Studio",
            Self::Msvc => "msvc",
            Self::Other(name) => name,
        }
    }

    /// Whether the family selects its C++ standard library with a flag
    pub fn selects_stdlib(&self) -> bool {
        matches!(self, Self::Clang | Self::AppleClang)
    }

    /// Whether the family links against a selectable MSVC runtime
    pub fn selects_msvc_runtime(&self) -> bool {
        matches!(self, Self::VisualStudio | Self::Msvc)
    }
}

impl From<String> for CompilerFamily {
    fn from(name: String) -> Self {
        match name.as_str() {
            "gcc" => Self::Gcc,
            "clang" => Self::Clang,
            "apple-clang" => Self::AppleClang,
            "Visual Studio" => Self::VisualStudio,
            "msvc" => Self::Msvc,
            _ => Self::Other(name),
        }
    }
}

impl From<CompilerFamily> for String {
    fn from(family: CompilerFamily) -> Self {
        family.as_str().to_string()
    }
}

impl FromStr for CompilerFamily {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.is_empty() {
            return Err(RecipeError::configuration("compiler family must not be empty"));
        }
        Ok(Self::from(name.to_string()))
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// C++ language standard level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CppStandard {
    #[serde(rename = "98")]
    Cpp98,
    #[serde(rename = "11")]
    Cpp11,
    #[serde(rename = "14")]
    Cpp14,
    #[serde(rename = "17")]
    Cpp17,
    #[serde(rename = "20")]
    Cpp20,
    #[serde(rename = "23")]
    Cpp23,
    #[serde(rename = "26")]
    Cpp26,
}

impl CppStandard {
    /// Numeric part of the standard (e.g. `17`)
    pub fn as_number(&self) -> &'static str {
        match self {
            Self::Cpp98 => "98",
            Self::Cpp11 => "11",
            Self::Cpp14 => "14",
            Self::Cpp17 => "17",
            Self::Cpp20 => "20",
            Self::Cpp23 => "23",
            Self::Cpp26 => "26",
        }
    }
}

impl FromStr for CppStandard {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        // gnu17 and c++17 select the same standard level as 17
        let level = s
            .trim()
            .trim_start_matches("gnu")
            .trim_start_matches("c++")
            .trim_start_matches("cpp");
        match level {
            "98" => Ok(Self::Cpp98),
            "11" => Ok(Self::Cpp11),
            "14" => Ok(Self::Cpp14),
            "17" => Ok(Self::Cpp17),
            "20" => Ok(Self::Cpp20),
            "23" => Ok(Self::Cpp23),
            "26" => Ok(Self::Cpp26),
            _ => Err(RecipeError::configuration(format!(
                "invalid C++ standard '{s}', valid values: 98, 11, 14, 17, 20, 23, 26"
            ))),
        }
    }
}

impl fmt::Display for CppStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C++{}", self.as_number())
    }
}

/// C++ standard library variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StdLib {
    #[serde(rename = "libstdc++")]
    Libstdcxx,
    #[serde(rename = "libstdc++11")]
    Libstdcxx11,
    #[serde(rename = "libc++")]
    Libcxx,
}

impl StdLib {
    /// Setting value (e.g. `libstdc++11`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Libstdcxx => "libstdc++",
            Self::Libstdcxx11 => "libstdc++11",
            Self::Libcxx => "libc++",
        }
    }

    /// Library name passed to `-stdlib=`; both libstdc++ ABIs share one
    pub fn library_name(&self) -> &'static str {
        match self {
            Self::Libstdcxx | Self::Libstdcxx11 => "libstdc++",
            Self::Libcxx => "libc++",
        }
    }
}

impl FromStr for StdLib {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "libstdc++" => Ok(Self::Libstdcxx),
            "libstdc++11" => Ok(Self::Libstdcxx11),
            "libc++" => Ok(Self::Libcxx),
            other => Err(RecipeError::configuration(format!(
                "invalid standard library '{other}', valid values: libstdc++, libstdc++11, libc++"
            ))),
        }
    }
}

/// Runtime linkage mode (MSVC CRT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Static,
    Dynamic,
}

impl FromStr for Runtime {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "static" | "MT" | "MTd" => Ok(Self::Static),
            "dynamic" | "MD" | "MDd" => Ok(Self::Dynamic),
            other => Err(RecipeError::configuration(format!(
                "invalid runtime '{other}', valid values: static, dynamic"
            ))),
        }
    }
}

/// CMake build type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Debug" => Ok(Self::Debug),
            "Release" => Ok(Self::Release),
            "RelWithDebInfo" => Ok(Self::RelWithDebInfo),
            "MinSizeRel" => Ok(Self::MinSizeRel),
            other => Err(RecipeError::configuration(format!(
                "invalid build type '{other}', valid values: Debug, Release, RelWithDebInfo, MinSizeRel"
            ))),
        }
    }
}

/// Parse a compiler version leniently into a semantic version
///
/// Settings carry versions such as `12`, `12.3` or `191`; missing components
/// are zero and components beyond the patch level are ignored.
pub fn parse_compiler_version(text: &str) -> Result<Version> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RecipeError::configuration("compiler version must not be empty"));
    }

    let mut parts = [0u64; 3];
    for (i, component) in text.split('.').enumerate() {
        let value = component.parse::<u64>().map_err(|_| {
            RecipeError::configuration(format!("invalid compiler version '{text}'"))
        })?;
        if i < parts.len() {
            parts[i] = value;
        }
    }

    Ok(Version::new(parts[0], parts[1], parts[2]))
}

/// Immutable description of the active toolchain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolchainDescriptor {
    pub family: CompilerFamily,
    pub version: Version,
    /// Standard library variant (`compiler.libcxx`)
    pub libcxx: Option<StdLib>,
    /// Explicitly configured language standard (`compiler.cppstd`)
    pub cppstd: Option<CppStandard>,
    /// Runtime linkage (`compiler.runtime`)
    pub runtime: Option<Runtime>,
    pub build_type: BuildType,
}

impl ToolchainDescriptor {
    /// Create a descriptor with no standard library, standard or runtime set
    pub fn new(family: CompilerFamily, version: Version) -> Self {
        Self {
            family,
            version,
            libcxx: None,
            cppstd: None,
            runtime: None,
            build_type: BuildType::default(),
        }
    }

    #[must_use]
    pub fn with_libcxx(mut self, libcxx: StdLib) -> Self {
        self.libcxx = Some(libcxx);
        self
    }

    #[must_use]
    pub fn with_cppstd(mut self, cppstd: CppStandard) -> Self {
        self.cppstd = Some(cppstd);
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    #[must_use]
    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }
}

impl fmt::Display for ToolchainDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.version)
    }
}
