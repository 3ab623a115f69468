//! Command-line argument parsing and validation

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// logr recipe - resolve, build and package the logr logging frontend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "recipe")]
pub struct Args {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Root of the recipe sources
    #[arg(long, global = true, default_value = ".")]
    pub recipe_dir: PathBuf,

    /// Option override, e.g. `-o glog_backend=False` (repeatable)
    #[arg(short = 'o', long = "option", global = true)]
    pub options: Vec<String>,

    /// Package only: skip tests, examples and benchmarks
    #[arg(long, global = true)]
    pub package_only: bool,

    #[command(flatten)]
    pub toolchain: ToolchainArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Toolchain settings
#[derive(ClapArgs, Debug)]
pub struct ToolchainArgs {
    /// Compiler family (gcc, clang, apple-clang, msvc, "Visual Studio", ...)
    #[arg(long, global = true, default_value = "gcc")]
    pub compiler: String,

    /// Compiler version (e.g. 12, 12.3, 193)
    #[arg(long, global = true, default_value = "12")]
    pub compiler_version: String,

    /// Standard library (libstdc++, libstdc++11, libc++)
    #[arg(long, global = true)]
    pub libcxx: Option<String>,

    /// Explicit C++ standard (98, 11, 14, 17, 20, 23, 26, gnu17, ...)
    #[arg(long, global = true)]
    pub cppstd: Option<String>,

    /// Runtime linkage (static, dynamic)
    #[arg(long, global = true)]
    pub runtime: Option<String>,

    /// Build type
    #[arg(long, global = true, default_value = "Release")]
    pub build_type: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the toolchain against the compatibility table
    Validate,

    /// Resolve dependencies and build configuration
    Resolve {
        /// Write the resolution plan as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run the full lifecycle: build, test and install the package
    Create {
        /// CMake binary directory
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,

        /// Install prefix of the package
        #[arg(long, default_value = "package")]
        package_dir: PathBuf,

        /// Parallel build jobs
        #[arg(short = 'j', long)]
        jobs: Option<u32>,

        /// Remove the build directory before configuring
        #[arg(long)]
        clean: bool,
    },

    /// Print the package identity
    Id,

    /// Print the package version detected from the sources
    Version,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
