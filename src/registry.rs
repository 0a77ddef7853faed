//! Module Registry
//!
//! The universe of modules the resolver works over. A registry only reads its
//! sources; the resolver never mutates it.
//!
//! # Catalog Format
//!
//! A catalog is a JSON file listing every module:
//! ```json
//! {
//!   "modules": [
//!     {
//!       "name": "org.netbeans.modules.editor",
//!       "dependencies": [
//!         { "kind": "module", "name": "org.openide.util/1", "version": "> 9.0" },
//!         { "kind": "needs", "name": "org.openide.modules.ModuleFormat1" }
//!       ],
//!       "provides": ["org.netbeans.api.editor.Editor"]
//!     }
//!   ]
//! }
//! ```
//!
//! A directory of `*.json` files, each holding a single module object, is
//! accepted as well.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ModpruneError, Result};
use crate::types::Dependency;

/// A module record as supplied by a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Unique module name
    pub name: String,

    /// Declared dependency edges, in declaration order
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Capability names this module provides
    #[serde(default)]
    pub provides: Vec<String>,
}

impl ModuleInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            provides: Vec::new(),
        }
    }

    /// Append a dependency edge
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Append a provided capability
    pub fn with_provides(mut self, capability: impl Into<String>) -> Self {
        self.provides.push(capability.into());
        self
    }
}

/// Anything that can enumerate the module universe
pub trait ModuleSource {
    fn modules(&self) -> Vec<&ModuleInfo>;
}

impl ModuleSource for [ModuleInfo] {
    fn modules(&self) -> Vec<&ModuleInfo> {
        self.iter().collect()
    }
}

impl ModuleSource for Vec<ModuleInfo> {
    fn modules(&self) -> Vec<&ModuleInfo> {
        self.iter().collect()
    }
}

#[derive(Debug, Deserialize)]
struct Catalog {
    modules: Vec<ModuleInfo>,
}

/// Ordered collection of modules loaded from catalogs
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleInfo>,
}

impl ModuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module
    pub fn register(&mut self, module: ModuleInfo) {
        self.modules.push(module);
    }

    /// Parse a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for module in catalog.modules {
            registry.register(validated(module)?);
        }
        Ok(registry)
    }

    /// Load a catalog file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModpruneError::registry(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content).map_err(|e| {
            ModpruneError::registry(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load every `*.json` module file from a directory, in path order.
    ///
    /// A missing directory contributes no modules.
    pub fn load_from_directory(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(0);
        }

        let read_error = |path: &Path, e: std::io::Error| {
            ModpruneError::registry(format!("failed to read {}: {}", path.display(), e))
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| read_error(dir, e))? {
            let path = entry.map_err(|e| read_error(dir, e))?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let content = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
            let module: ModuleInfo = serde_json::from_str(&content).map_err(|e| {
                ModpruneError::registry(format!("failed to parse {}: {}", path.display(), e))
            })?;
            self.register(validated(module)?);
        }

        Ok(paths.len())
    }

    /// Load from a path that is either a catalog file or a module directory
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if path.is_dir() {
            let count = self.load_from_directory(path)?;
            debug!("Loaded {} modules from directory {:?}", count, path);
            Ok(count)
        } else {
            let loaded = Self::from_file(path)?;
            let count = loaded.modules.len();
            self.modules.extend(loaded.modules);
            debug!("Loaded {} modules from catalog {:?}", count, path);
            Ok(count)
        }
    }

    /// Load and merge several catalog files or directories
    pub fn load_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut registry = Self::new();
        for path in paths {
            registry.load_path(path)?;
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleSource for ModuleRegistry {
    fn modules(&self) -> Vec<&ModuleInfo> {
        self.modules.iter().collect()
    }
}

fn validated(module: ModuleInfo) -> Result<ModuleInfo> {
    if module.name.trim().is_empty() {
        return Err(ModpruneError::registry("module with empty name"));
    }
    Ok(module)
}
