//! Option model
//!
//! The fixed set of boolean feature flags (one per optional logging backend)
//! with their defaults. Unknown flags are configuration errors.

use crate::error::{RecipeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Package name used as an optional scope prefix on option overrides
const SCOPE_PREFIX: &str = "logr:";

/// Optional logging backend the library can adapt to
///
/// Variant order is the registry declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Spdlog,
    Glog,
    Log4cplus,
    Boostlog,
}

impl Backend {
    /// All backends in registry order
    pub const ALL: [Self; 4] = [Self::Spdlog, Self::Glog, Self::Log4cplus, Self::Boostlog];

    /// Short backend name (e.g. `spdlog`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spdlog => "spdlog",
            Self::Glog => "glog",
            Self::Log4cplus => "log4cplus",
            Self::Boostlog => "boostlog",
        }
    }

    /// Option flag controlling this backend (e.g. `spdlog_backend`)
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Spdlog => "spdlog_backend",
            Self::Glog => "glog_backend",
            Self::Log4cplus => "log4cplus_backend",
            Self::Boostlog => "boostlog_backend",
        }
    }

    /// Look up a backend by its option flag
    pub fn from_flag(flag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.flag() == flag)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse an option value the way recipe options are spelled
fn parse_flag_value(flag: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(RecipeError::configuration(format!(
            "option '{flag}' expects True or False, got '{value}'"
        ))),
    }
}

/// Resolved mapping from backend flag to boolean
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionSet {
    flags: BTreeMap<Backend, bool>,
}

impl Default for OptionSet {
    /// Every backend is enabled by default
    fn default() -> Self {
        Self {
            flags: Backend::ALL.into_iter().map(|b| (b, true)).collect(),
        }
    }
}

impl OptionSet {
    /// Build an option set from the defaults plus `name=value` overrides
    ///
    /// Overrides may be scoped to the package (`logr:glog_backend=False`).
    pub fn from_overrides<S: AsRef<str>>(overrides: &[S]) -> Result<Self> {
        let mut options = Self::default();
        for entry in overrides {
            let entry = entry.as_ref();
            let (name, value) = entry.split_once('=').ok_or_else(|| {
                RecipeError::configuration(format!(
                    "option override '{entry}' must have the form name=value"
                ))
            })?;
            let name = name.trim();
            let name = name.strip_prefix(SCOPE_PREFIX).unwrap_or(name);
            options.set(name, value)?;
        }
        Ok(options)
    }

    /// Set a flag by name, rejecting unregistered flags
    pub fn set(&mut self, flag: &str, value: &str) -> Result<()> {
        let backend = Backend::from_flag(flag).ok_or_else(|| {
            let known: Vec<&str> = Backend::ALL.iter().map(Backend::flag).collect();
            RecipeError::configuration(format!(
                "unknown option '{flag}', registered options: {}",
                known.join(", ")
            ))
        })?;
        let enabled = parse_flag_value(flag, value)?;
        debug!("Option {} = {}", flag, enabled);
        self.flags.insert(backend, enabled);
        Ok(())
    }

    /// Builder-style toggle used by callers that already hold a `Backend`
    #[must_use]
    pub fn with(mut self, backend: Backend, enabled: bool) -> Self {
        self.flags.insert(backend, enabled);
        self
    }

    pub fn is_enabled(&self, backend: Backend) -> bool {
        self.flags.get(&backend).copied().unwrap_or(false)
    }

    /// Enabled backends in registry order
    pub fn enabled(&self) -> impl Iterator<Item = Backend> + '_ {
        self.flags
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(backend, _)| *backend)
    }

    /// All flags in registry order
    pub fn iter(&self) -> impl Iterator<Item = (Backend, bool)> + '_ {
        self.flags.iter().map(|(b, e)| (*b, *e))
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .iter()
            .map(|(b, e)| format!("{}={}", b.flag(), if e { "True" } else { "False" }))
            .collect();
        f.write_str(&rendered.join(" "))
    }
}

impl FromStr for OptionSet {
    type Err = RecipeError;

    /// Parse whitespace- or comma-separated `name=value` overrides
    fn from_str(s: &str) -> Result<Self> {
        let overrides: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();
        Self::from_overrides(&overrides)
    }
}
