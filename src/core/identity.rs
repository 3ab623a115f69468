//! Package identity
//!
//! The published artifact is header-only, so its binary identity does not
//! depend on compiler, build type, architecture or backend options. The
//! identity is computed from the package name and version alone.

use semver::Version;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Cache key of the published artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageIdentity(String);

impl PackageIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the identity of a `(name, version)` pair
pub fn compute_identity(name: &str, version: &Version) -> PackageIdentity {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(b"\0");
    hasher.update(version.to_string().as_bytes());
    PackageIdentity(hex::encode(hasher.finalize()))
}
