//! Configuration file handling for saving and loading compute settings.
//!
//! A configuration names the root modules and the registries to read. Both
//! can be overridden from the command line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::roots::default_roots;

/// Settings for a disabled-module computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeConfig {
    /// Modules whose closure stays enabled
    pub root_modules: Vec<String>,

    /// Catalog files or module directories making up the universe
    pub registries: Vec<PathBuf>,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            root_modules: default_roots(),
            registries: Vec::new(),
        }
    }
}

impl ComputeConfig {
    /// Create a configuration with the default roots and no registries
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.root_modules.is_empty() {
            anyhow::bail!("At least one root module must be specified");
        }

        let mut seen = HashSet::new();
        for root in &self.root_modules {
            if root.trim().is_empty() {
                anyhow::bail!("Root module names cannot be blank");
            }
            if root.trim() != root {
                anyhow::bail!("Root module '{}' has surrounding whitespace", root);
            }
            if !seen.insert(root.as_str()) {
                anyhow::bail!("Duplicate root module: {}", root);
            }
        }

        for registry in &self.registries {
            if registry.as_os_str().is_empty() {
                anyhow::bail!("Registry paths cannot be empty");
            }
        }

        Ok(())
    }

    /// Apply command-line overrides.
    ///
    /// Non-empty `roots` replace the configured roots; `registries` are appended.
    pub fn with_overrides(mut self, roots: &[String], registries: &[PathBuf]) -> Self {
        if !roots.is_empty() {
            self.root_modules = roots.to_vec();
        }
        self.registries.extend(registries.iter().cloned());
        self
    }
}
