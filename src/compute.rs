//! Disabled-module computation
//!
//! Runs the three stages in order: index the universe, resolve the closure of
//! the roots, then merge `disabled.modules` into the target property file.
//! Diagnostics go to the log as they are collected; only missing roots and
//! property-file I/O stop the run.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::logic::index::ModuleIndex;
use crate::logic::resolver::{self, Diagnostic, DiagnosticLevel};
use crate::properties::PropertyFile;
use crate::registry::ModuleSource;

/// Property key holding the comma-separated disabled module list
pub const DISABLED_MODULES_KEY: &str = "disabled.modules";

/// Separator between module names in [`DISABLED_MODULES_KEY`]
pub const MODULE_LIST_SEPARATOR: &str = ",";

/// Knobs for a computation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputeOptions {
    /// Merge the property file in memory but do not write it
    pub dry_run: bool,
}

/// What a computation run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeOutcome {
    /// Number of modules kept enabled
    pub required: usize,
    /// Modules written to [`DISABLED_MODULES_KEY`], in index order
    pub disabled: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the property file was rewritten
    pub written: bool,
}

impl ComputeOutcome {
    /// The value stored under [`DISABLED_MODULES_KEY`]
    pub fn disabled_value(&self) -> String {
        self.disabled.join(MODULE_LIST_SEPARATOR)
    }
}

/// Compute the disabled modules for `roots` and merge them into `target`.
///
/// # Errors
///
/// - [`crate::ModpruneError::MissingRootModules`] before anything is read or written
/// - [`crate::ModpruneError::ReadProperties`] / [`crate::ModpruneError::WriteProperties`]
///   on property-file I/O
pub fn compute_disabled_modules<S, R>(
    source: &S,
    roots: &[R],
    target: &Path,
    options: ComputeOptions,
) -> Result<ComputeOutcome>
where
    S: ModuleSource + ?Sized,
    R: AsRef<str>,
{
    let index = ModuleIndex::build(source);
    debug!("Indexed {} modules", index.len());

    let resolution = resolver::resolve(roots, &index)?;
    report(&resolution.diagnostics);

    let disabled = index.disabled_modules(&resolution.required);
    info!(
        "{} modules required, {} disabled",
        resolution.required.len(),
        disabled.len()
    );

    let outcome = ComputeOutcome {
        required: resolution.required.len(),
        disabled,
        diagnostics: resolution.diagnostics,
        written: !options.dry_run,
    };

    let mut properties = PropertyFile::load(target)?;
    properties.set(DISABLED_MODULES_KEY, outcome.disabled_value());

    if options.dry_run {
        info!("Dry run: not writing {:?}", target);
    } else {
        properties.store(target)?;
        info!("Wrote {} to {:?}", DISABLED_MODULES_KEY, target);
    }

    Ok(outcome)
}

/// Emit diagnostics on the log
fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match diagnostic.level() {
            DiagnosticLevel::Warning => warn!("{}", diagnostic),
            DiagnosticLevel::Info => info!("{}", diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModpruneError;
    use crate::registry::ModuleInfo;
    use crate::types::Dependency;

    fn universe() -> Vec<ModuleInfo> {
        vec![
            ModuleInfo::new("A").with_dependency(Dependency::ModuleRef("B".to_string())),
            ModuleInfo::new("B"),
            ModuleInfo::new("C"),
            ModuleInfo::new("D"),
        ]
    }

    #[test]
    fn test_writes_disabled_modules() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("platform.properties");

        let outcome =
            compute_disabled_modules(&universe(), &["A"], &target, ComputeOptions::default())
                .unwrap();

        assert_eq!(outcome.required, 2);
        assert_eq!(outcome.disabled, vec!["C", "D"]);
        assert!(outcome.written);
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "disabled.modules=C,D\n"
        );
    }

    #[test]
    fn test_preserves_existing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("platform.properties");
        std::fs::write(
            &target,
            "# settings\nother=1\ndisabled.modules=old\nlast = x\n",
        )
        .unwrap();

        compute_disabled_modules(&universe(), &["A", "C"], &target, ComputeOptions::default())
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "# settings\nother=1\ndisabled.modules=D\nlast = x\n"
        );
    }

    #[test]
    fn test_duplicate_key_collapses() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("platform.properties");
        std::fs::write(&target, "disabled.modules=old1\ndisabled.modules=old2\n").unwrap();

        compute_disabled_modules(&universe(), &["A", "D"], &target, ComputeOptions::default())
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "disabled.modules=C\n"
        );
        let reread = PropertyFile::load(&target).unwrap();
        assert_eq!(reread.get(DISABLED_MODULES_KEY), Some("C"));
    }

    #[test]
    fn test_everything_required_writes_empty_value() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("platform.properties");

        let outcome = compute_disabled_modules(
            &universe(),
            &["A", "C", "D"],
            &target,
            ComputeOptions::default(),
        )
        .unwrap();

        assert!(outcome.disabled.is_empty());
        assert_eq!(outcome.disabled_value(), "");
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "disabled.modules=\n"
        );
    }

    #[test]
    fn test_missing_root_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("platform.properties");

        let result =
            compute_disabled_modules(&universe(), &["A", "Z"], &target, ComputeOptions::default());

        assert!(matches!(result, Err(ModpruneError::MissingRootModules(_))));
        assert!(!target.exists());
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("platform.properties");
        std::fs::write(&target, "keep=me\n").unwrap();

        let outcome =
            compute_disabled_modules(&universe(), &["A"], &target, ComputeOptions { dry_run: true })
                .unwrap();

        assert!(!outcome.written);
        assert_eq!(outcome.disabled_value(), "C,D");
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep=me\n");
    }

    #[test]
    fn test_diagnostics_do_not_fail_run() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("platform.properties");
        let modules = vec![
            ModuleInfo::new("A").with_dependency(Dependency::CapabilityNeed("y".to_string())),
        ];

        let outcome =
            compute_disabled_modules(&modules, &["A"], &target, ComputeOptions::default())
                .unwrap();

        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(target.exists());
    }
}
