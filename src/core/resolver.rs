//! Dependency resolution
//!
//! Turns the active option set and toolchain into the ordered list of
//! upstream requirements.

use crate::core::options::OptionSet;
use crate::core::registry::{DependencySpec, Registry};
use crate::core::toolchain::ToolchainDescriptor;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

/// A pinned upstream requirement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    pub name: String,
    pub version: Version,
    pub sub_options: BTreeMap<String, String>,
}

impl DependencyDeclaration {
    /// Materialize a registry entry for the given toolchain
    fn from_spec(spec: &DependencySpec, toolchain: &ToolchainDescriptor) -> Self {
        Self {
            name: spec.name.to_string(),
            version: spec.pin.select(toolchain).clone(),
            sub_options: spec
                .sub_options
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Requirement reference (`name/version`)
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        for (key, value) in &self.sub_options {
            write!(f, " {}:{}={}", self.name, key, value)?;
        }
        Ok(())
    }
}

/// Resolve the runtime requirements of the package
///
/// The base formatting dependency comes first, followed by one declaration
/// per enabled backend in registry order. Pin rules are evaluated against
/// `toolchain` on every call.
#[instrument(skip(registry))]
pub fn resolve(
    registry: &Registry,
    options: &OptionSet,
    toolchain: &ToolchainDescriptor,
) -> Vec<DependencyDeclaration> {
    let mut dependencies = vec![DependencyDeclaration::from_spec(&registry.base, toolchain)];

    for entry in registry.backends {
        if !options.is_enabled(entry.backend) {
            debug!("Backend {} disabled, skipping {}", entry.backend, entry.dependency.name);
            continue;
        }
        let declaration = DependencyDeclaration::from_spec(&entry.dependency, toolchain);
        debug!("Requires {}", declaration);
        dependencies.push(declaration);
    }

    dependencies
}

/// Requirements only needed to build and run tests, examples and benchmarks
pub fn build_requirements(
    registry: &Registry,
    toolchain: &ToolchainDescriptor,
    test_mode: bool,
) -> Vec<DependencyDeclaration> {
    if !test_mode {
        return Vec::new();
    }
    registry
        .test_requirements
        .iter()
        .map(|spec| DependencyDeclaration::from_spec(spec, toolchain))
        .collect()
}
