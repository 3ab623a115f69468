//! Core functionality of the recipe
//!
//! Contains the registry and option model, the validation, resolution and
//! emission steps, and the lifecycle that sequences them.

pub mod builder;
pub mod emitter;
pub mod identity;
pub mod lifecycle;
pub mod options;
pub mod package_info;
pub mod registry;
pub mod resolver;
pub mod toolchain;
pub mod validator;
pub mod version;

pub use builder::CMakeBuilder;
pub use emitter::{BuildConfiguration, ConfigValue, emit};
pub use identity::{PackageIdentity, compute_identity};
pub use lifecycle::{BuildSystem, Pipeline, PipelineOutcome, PlanRequest, ResolutionPlan, Stage};
pub use options::{Backend, OptionSet};
pub use registry::{PinRule, Registry};
pub use resolver::{DependencyDeclaration, build_requirements, resolve};
pub use toolchain::{CompilerFamily, CppStandard, ToolchainDescriptor};
pub use validator::{CompatibilityVerdict, validate};
pub use version::VersionDetector;
