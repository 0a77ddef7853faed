//! Closure Resolver
//!
//! Computes the transitive set of modules that must stay enabled so that every
//! root module keeps working.
//!
//! # Edge Rules
//!
//! | Edge                  | Effect on the closure |
//! |-----------------------|-----------------------|
//! | `ModuleRef`           | Target (suffix stripped) is pulled in; missing target is a diagnostic |
//! | `CapabilityNeed`      | Sole provider is pulled in; none or several providers is a diagnostic |
//! | `CapabilityRequire`   | Same as `CapabilityNeed` |
//! | `CapabilityRecommend` | Never pulled in; providers are reported |
//! | `PlatformConstraint`  | Ignored |
//! | `Unknown`             | Ignored, reported |
//!
//! Each capability name is looked at once per run and per edge kind, whichever
//! module asks for it first.
//!
//! # What This Explicitly Refuses To Do
//!
//! - Pick between several providers of a capability: ambiguous capabilities
//!   contribute nothing to the closure
//! - Treat `requires` more strictly than `needs`

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use strum::Display;
use tracing::debug;

use crate::error::{ModpruneError, Result};
use crate::logic::index::ModuleIndex;
use crate::registry::ModuleInfo;
use crate::types::{Dependency, module_base_name};

/// Capability edge kinds that pull providers into the closure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CapabilityEdge {
    Needs,
    Requires,
}

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warning,
    Info,
}

/// A non-fatal finding reported while resolving the closure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A `ModuleRef` points at a module outside the universe
    ModuleNotFound { module: String, dependency: String },

    /// No module provides a needed or required capability
    MissingCapability {
        module: String,
        capability: String,
        edge: CapabilityEdge,
    },

    /// Several modules provide a capability, none was picked
    AmbiguousCapability {
        module: String,
        capability: String,
        edge: CapabilityEdge,
        candidates: Vec<String>,
    },

    /// Providers of a recommended capability
    Recommendation {
        module: String,
        capability: String,
        providers: Vec<String>,
    },

    /// An edge kind the resolver does not handle
    UnhandledDependency { module: String, dependency: String },
}

impl Diagnostic {
    pub fn level(&self) -> DiagnosticLevel {
        match self {
            Self::Recommendation { .. } => DiagnosticLevel::Info,
            _ => DiagnosticLevel::Warning,
        }
    }

    /// Name of the module whose edge produced this diagnostic
    pub fn module(&self) -> &str {
        match self {
            Self::ModuleNotFound { module, .. }
            | Self::MissingCapability { module, .. }
            | Self::AmbiguousCapability { module, .. }
            | Self::Recommendation { module, .. }
            | Self::UnhandledDependency { module, .. } => module,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleNotFound { module, dependency } => {
                write!(f, "module {}: cannot find module {}", module, dependency)
            }
            Self::MissingCapability {
                module,
                capability,
                edge,
            } => write!(
                f,
                "module {} {} capability '{}', but no module provides it",
                module, edge, capability
            ),
            Self::AmbiguousCapability {
                module,
                capability,
                edge,
                candidates,
            } => write!(
                f,
                "module {} {} capability '{}', provided by several modules: [{}]",
                module,
                edge,
                capability,
                candidates.join(", ")
            ),
            Self::Recommendation {
                module,
                capability,
                providers,
            } => write!(
                f,
                "module {} recommends capability '{}', provided by: [{}]",
                module,
                capability,
                providers.join(", ")
            ),
            Self::UnhandledDependency { module, dependency } => {
                write!(f, "module {}: unhandled dependency {}", module, dependency)
            }
        }
    }
}

/// Result of a closure computation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Names of every module that must stay enabled
    pub required: BTreeSet<String>,
    /// Findings in the order they were encountered
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn contains(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level() == DiagnosticLevel::Warning)
            .count()
    }
}

/// Worklist traversal over a [`ModuleIndex`].
///
/// Holds the per-run capability seen-sets, so a resolver is consumed by
/// [`ClosureResolver::resolve`] and never shared between runs.
pub struct ClosureResolver<'i, 'a> {
    index: &'i ModuleIndex<'a>,
    seen_needs: HashSet<&'a str>,
    seen_requires: HashSet<&'a str>,
    seen_recommends: HashSet<&'a str>,
    diagnostics: Vec<Diagnostic>,
}

impl<'i, 'a> ClosureResolver<'i, 'a> {
    pub fn new(index: &'i ModuleIndex<'a>) -> Self {
        Self {
            index,
            seen_needs: HashSet::new(),
            seen_requires: HashSet::new(),
            seen_recommends: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Compute the closure of `roots`.
    ///
    /// Fails before any traversal if a root is missing, naming every missing root.
    pub fn resolve<S: AsRef<str>>(mut self, roots: &[S]) -> Result<Resolution> {
        let mut pending: VecDeque<&'a ModuleInfo> = VecDeque::new();
        let mut missing: Vec<String> = Vec::new();

        for root in roots {
            let root = root.as_ref();
            match self.index.get(root) {
                Some(module) => pending.push_back(module),
                None if !missing.iter().any(|m| m == root) => missing.push(root.to_string()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(ModpruneError::MissingRootModules(missing));
        }

        debug!(
            "Resolving closure of {} roots over {} modules",
            roots.len(),
            self.index.len()
        );

        let mut required = BTreeSet::new();
        while let Some(module) = pending.pop_front() {
            if !required.insert(module.name.clone()) {
                continue;
            }
            for dependency in &module.dependencies {
                self.expand(module, dependency, &mut pending);
            }
        }

        debug!(
            "Closure holds {} modules, {} diagnostics",
            required.len(),
            self.diagnostics.len()
        );

        Ok(Resolution {
            required,
            diagnostics: self.diagnostics,
        })
    }

    fn expand(
        &mut self,
        module: &'a ModuleInfo,
        dependency: &'a Dependency,
        pending: &mut VecDeque<&'a ModuleInfo>,
    ) {
        match dependency {
            Dependency::ModuleRef(name) => {
                let target = module_base_name(name);
                match self.index.get(target) {
                    Some(found) => pending.push_back(found),
                    None => self.diagnostics.push(Diagnostic::ModuleNotFound {
                        module: module.name.clone(),
                        dependency: target.to_string(),
                    }),
                }
            }
            Dependency::CapabilityNeed(capability) => {
                if self.seen_needs.insert(capability.as_str()) {
                    self.resolve_capability(module, capability, CapabilityEdge::Needs, pending);
                }
            }
            Dependency::CapabilityRequire(capability) => {
                if self.seen_requires.insert(capability.as_str()) {
                    self.resolve_capability(module, capability, CapabilityEdge::Requires, pending);
                }
            }
            Dependency::CapabilityRecommend(capability) => {
                if self.seen_recommends.insert(capability.as_str()) {
                    let providers = self
                        .index
                        .providers(capability)
                        .map(|p| p.iter().map(|s| s.to_string()).collect())
                        .unwrap_or_default();
                    self.diagnostics.push(Diagnostic::Recommendation {
                        module: module.name.clone(),
                        capability: capability.clone(),
                        providers,
                    });
                }
            }
            Dependency::PlatformConstraint(_) => {}
            Dependency::Unknown { .. } => {
                self.diagnostics.push(Diagnostic::UnhandledDependency {
                    module: module.name.clone(),
                    dependency: dependency.to_string(),
                });
            }
        }
    }

    fn resolve_capability(
        &mut self,
        module: &'a ModuleInfo,
        capability: &str,
        edge: CapabilityEdge,
        pending: &mut VecDeque<&'a ModuleInfo>,
    ) {
        let index = self.index;
        match index.providers(capability) {
            None => self.diagnostics.push(Diagnostic::MissingCapability {
                module: module.name.clone(),
                capability: capability.to_string(),
                edge,
            }),
            Some(providers) if providers.len() == 1 => {
                if let Some(provider) = providers.iter().next().and_then(|p| index.get(p)) {
                    pending.push_back(provider);
                }
            }
            Some(providers) => self.diagnostics.push(Diagnostic::AmbiguousCapability {
                module: module.name.clone(),
                capability: capability.to_string(),
                edge,
                candidates: providers.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

/// Compute the closure of `roots` over `index`
pub fn resolve<S: AsRef<str>>(roots: &[S], index: &ModuleIndex<'_>) -> Result<Resolution> {
    ClosureResolver::new(index).resolve(roots)
}

// ============================================================================
// Tests
// ============================================================================
