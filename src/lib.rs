//! modprune Library
//!
//! Computes the minimal set of modules a fixed root set depends on and
//! records every other module under `disabled.modules` in a property file.

pub mod cli;
pub mod compute;
pub mod config_file;
pub mod error;
pub mod logic;
pub mod properties;
pub mod registry;
pub mod roots;
pub mod types;

// Re-export main types for convenience
pub use compute::{
    ComputeOptions, ComputeOutcome, DISABLED_MODULES_KEY, compute_disabled_modules,
};
pub use config_file::ComputeConfig;
pub use error::{ModpruneError, Result};
pub use logic::index::ModuleIndex;
pub use logic::resolver::{
    CapabilityEdge, ClosureResolver, Diagnostic, DiagnosticLevel, Resolution, resolve,
};
pub use properties::PropertyFile;
pub use registry::{ModuleInfo, ModuleRegistry, ModuleSource};
pub use roots::DEFAULT_ROOT_MODULES;
pub use types::{Dependency, DependencyKind, module_base_name};
