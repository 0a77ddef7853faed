//! Module and capability lookup tables
//!
//! Built once per run from the module universe and read-only afterwards.
//! Both maps are ordered so that every derived list (disabled modules,
//! ambiguity candidates) comes out in the same order on every run.

use std::collections::{BTreeMap, BTreeSet};

use crate::registry::{ModuleInfo, ModuleSource};

/// Name and capability index over a module universe
#[derive(Debug, Default)]
pub struct ModuleIndex<'a> {
    by_name: BTreeMap<&'a str, &'a ModuleInfo>,
    providers: BTreeMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> ModuleIndex<'a> {
    /// Index every module of a source.
    ///
    /// Duplicate names are not detected; the last module with a given name wins.
    pub fn build<S: ModuleSource + ?Sized>(source: &'a S) -> Self {
        Self::from_modules(source.modules())
    }

    pub fn from_modules(modules: impl IntoIterator<Item = &'a ModuleInfo>) -> Self {
        let mut index = Self::default();
        for module in modules {
            index.by_name.insert(module.name.as_str(), module);
            for capability in &module.provides {
                index
                    .providers
                    .entry(capability.as_str())
                    .or_default()
                    .insert(module.name.as_str());
            }
        }
        index
    }

    /// Look up a module by exact name
    pub fn get(&self, name: &str) -> Option<&'a ModuleInfo> {
        self.by_name.get(name).copied()
    }

    /// Modules providing a capability, if any module declares it
    pub fn providers(&self, capability: &str) -> Option<&BTreeSet<&'a str>> {
        self.providers.get(capability)
    }

    /// All module names, in index order
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.by_name.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Universe minus `required`, in index order
    pub fn disabled_modules(&self, required: &BTreeSet<String>) -> Vec<String> {
        self.names()
            .filter(|name| !required.contains(*name))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> Vec<ModuleInfo> {
        vec![
            ModuleInfo::new("c").with_provides("x"),
            ModuleInfo::new("a"),
            ModuleInfo::new("b").with_provides("x").with_provides("y"),
        ]
    }

    #[test]
    fn test_index_by_name() {
        let modules = universe();
        let index = ModuleIndex::build(&modules);

        assert_eq!(index.len(), 3);
        assert!(index.get("a").is_some());
        assert!(index.get("z").is_none());
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_capability_index() {
        let modules = universe();
        let index = ModuleIndex::build(&modules);

        let x: Vec<&str> = index.providers("x").unwrap().iter().copied().collect();
        assert_eq!(x, vec!["b", "c"]);
        assert_eq!(index.providers("y").unwrap().len(), 1);
        assert!(index.providers("none").is_none());
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let modules = vec![
            ModuleInfo::new("a").with_provides("first"),
            ModuleInfo::new("a").with_provides("second"),
        ];
        let index = ModuleIndex::build(&modules);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a").unwrap().provides, vec!["second".to_string()]);
    }

    #[test]
    fn test_disabled_modules_complement() {
        let modules = universe();
        let index = ModuleIndex::build(&modules);
        let required: BTreeSet<String> = ["b".to_string()].into_iter().collect();

        assert_eq!(index.disabled_modules(&required), vec!["a", "c"]);
    }

    #[test]
    fn test_empty_universe() {
        let modules: Vec<ModuleInfo> = Vec::new();
        let index = ModuleIndex::build(&modules);
        assert!(index.is_empty());
        assert!(index.disabled_modules(&BTreeSet::new()).is_empty());
    }
}
