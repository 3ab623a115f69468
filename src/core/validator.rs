//! Compiler compatibility validation
//!
//! Checks the active toolchain against the registry before anything is
//! resolved. Unregistered compilers are let through with warnings.

use crate::core::registry::Registry;
use crate::core::toolchain::{CppStandard, ToolchainDescriptor};
use crate::error::{RecipeError, Result};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Outcome of validating a toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum CompatibilityVerdict {
    Pass,
    /// Hard stop: the compiler is older than the registered minimum
    Fail { reason: String },
    /// No registry entry for the compiler; resolution continues
    UnknownCompiler { warnings: [String; 2] },
}

impl CompatibilityVerdict {
    /// Log any warnings carried by the verdict
    pub fn report(&self) {
        if let Self::UnknownCompiler { warnings } = self {
            for warning in warnings {
                warn!("{}", warning);
            }
        }
    }
}

/// Validate a toolchain against the registry's compatibility table
///
/// An explicitly configured language standard below `min_standard` is an
/// error whatever the compiler. Otherwise the verdict is `UnknownCompiler`
/// for unregistered families and `Fail`/`Pass` from a semantic version
/// comparison for registered ones.
#[instrument(skip(registry))]
pub fn validate(
    registry: &Registry,
    toolchain: &ToolchainDescriptor,
    min_standard: CppStandard,
) -> Result<CompatibilityVerdict> {
    let name = registry.package.name;

    if let Some(cppstd) = toolchain.cppstd {
        debug!("Configured standard {} (minimum {})", cppstd, min_standard);
        if cppstd < min_standard {
            return Err(RecipeError::incompatible_toolchain(
                toolchain.to_string(),
                format!(
                    "{name} requires at least {min_standard}, but compiler.cppstd is {}",
                    cppstd.as_number()
                ),
            ));
        }
    }

    let family = toolchain.family.as_str();
    let Some(minimum) = registry.minimum_compiler_version(family) else {
        return Ok(CompatibilityVerdict::UnknownCompiler {
            warnings: [
                format!(
                    "{name} recipe lacks information about the {family} compiler standard version support"
                ),
                format!(
                    "{name} requires a compiler that supports at least {min_standard}"
                ),
            ],
        });
    };

    if toolchain.version < *minimum {
        return Ok(CompatibilityVerdict::Fail {
            reason: format!(
                "{name} requires a compiler that supports at least {min_standard}: \
                 {family} {} is below the minimum version {minimum}",
                toolchain.version
            ),
        });
    }

    debug!("{} satisfies minimum version {}", toolchain, minimum);
    Ok(CompatibilityVerdict::Pass)
}
