//! Default root module set.
//!
//! The closure is computed from these modules unless a configuration file or
//! `--root` overrides them. The list targets a headless Java language server
//! distribution.
//!
//! # Root Groups
//!
//! | Group               | Why it is a root |
//! |---------------------|------------------|
//! | Language server     | The server itself |
//! | OSGi support        | Loads OSGi bundles |
//! | Integration layer   | Used by the editor integration module |
//! | Runtime plumbing    | Editor, lexer, file system and platform services |

/// Module names that must always stay enabled, in declaration order.
pub const DEFAULT_ROOT_MODULES: &[&str] = &[
    // Language server
    "org.netbeans.modules.java.lsp.server",
    // OSGi support
    "org.netbeans.modules.netbinox",
    // Integration layer
    "org.netbeans.modules.project.dependency",
    "org.netbeans.modules.updatecenters",
    "org.netbeans.swing.laf.flatlaf",
    "org.netbeans.core.execution", // default ExecutionEngine
    // Runtime plumbing
    "org.netbeans.modules.autoupdate.cli", // --modules option
    "org.netbeans.modules.editor",
    "org.netbeans.modules.editor.mimelookup.impl",
    "org.netbeans.modules.lexer.nbbridge",
    "org.netbeans.modules.java.j2seplatform", // JRT file system
    "org.netbeans.modules.masterfs.nio2",
    "org.netbeans.modules.masterfs.ui",
];

/// Default roots as owned strings
pub fn default_roots() -> Vec<String> {
    DEFAULT_ROOT_MODULES.iter().map(|s| s.to_string()).collect()
}
