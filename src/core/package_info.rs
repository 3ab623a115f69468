//! Consumer-facing package information
//!
//! Describes how consumers find and link the installed package: no binary,
//! library or framework directories, a base component carrying the include
//! directory and one component per enabled backend.

use crate::core::options::OptionSet;
use crate::core::registry::Registry;
use serde::{Deserialize, Serialize};

/// Name of the component holding the headers
pub const BASE_COMPONENT: &str = "logr_base";

/// One linkable component of the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub include_dirs: Vec<String>,
    pub requires: Vec<String>,
}

/// Package information handed to consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub cmake_file_name: String,
    pub bin_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub framework_dirs: Vec<String>,
    pub components: Vec<Component>,
}

impl PackageInfo {
    /// Build the package information for the enabled backends
    pub fn new(registry: &Registry, options: &OptionSet) -> Self {
        let name = registry.package.name;
        let mut components = vec![Component {
            name: BASE_COMPONENT.to_string(),
            include_dirs: vec!["include".to_string()],
            requires: vec![registry.base_target.to_string()],
        }];

        for entry in registry.backends {
            if options.is_enabled(entry.backend) {
                components.push(Component {
                    name: format!("{name}_{}", entry.backend.name()),
                    include_dirs: Vec::new(),
                    requires: vec![
                        BASE_COMPONENT.to_string(),
                        entry.component_target.to_string(),
                    ],
                });
            }
        }

        Self {
            cmake_file_name: name.to_string(),
            bin_dirs: Vec::new(),
            lib_dirs: Vec::new(),
            framework_dirs: Vec::new(),
            components,
        }
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}
