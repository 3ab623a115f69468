//! # logr recipe
//!
//! Package recipe for `logr`, a header-only C++ logging frontend that adapts
//! to spdlog, glog, log4cplus and Boost.Log. This library resolves the
//! recipe: it validates the toolchain, turns the backend options into pinned
//! upstream requirements and CMake variables, drives the downstream build
//! and computes the identity the artifact store caches the package under.
//!
//! ## Features
//!
//! - Static registry of compiler minimums and backend coordinates
//! - Permissive handling of unregistered compilers (warnings, not errors)
//! - Toolchain-dependent version pins
//! - Deterministic dependency order and build configuration
//! - Header-only package identity independent of build settings
//!
//! ## Example
//!
//! ```no_run
//! use logr_recipe::core::{
//!     CompilerFamily, OptionSet, PlanRequest, Registry, ToolchainDescriptor,
//!     lifecycle::resolve_plan,
//! };
//! use semver::Version;
//!
//! let request = PlanRequest {
//!     version: Version::new(0, 7, 0),
//!     options: OptionSet::default(),
//!     toolchain: ToolchainDescriptor::new(CompilerFamily::Gcc, Version::new(12, 0, 0)),
//!     test_mode: false,
//! };
//! let plan = resolve_plan(Registry::current(), &request)?;
//! for dep in &plan.requires {
//!     println!("{dep}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
