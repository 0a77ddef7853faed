use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modprune - compute which modules can be disabled
#[derive(Parser, Debug)]
#[command(name = "modprune")]
#[command(about = "Computes the modules required by a fixed root set and records the rest as disabled")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: resolve and report, but do not rewrite the property file.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Property file that receives `disabled.modules`.
    ///
    /// When omitted nothing is computed.
    #[arg(long, value_name = "PATH")]
    pub compute_disabled_modules: Option<PathBuf>,

    /// Module catalog file or directory of module files (repeatable)
    #[arg(short, long, value_name = "PATH")]
    pub registry: Vec<PathBuf>,

    /// Root module name (repeatable); replaces the configured roots
    #[arg(long = "root", value_name = "NAME")]
    pub roots: Vec<String>,

    /// Path to a JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_args() {
        let cli = Cli::try_parse_from(["modprune"]).unwrap();
        assert!(cli.compute_disabled_modules.is_none());
        assert!(cli.command.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_compute_with_registries_and_roots() {
        let cli = Cli::try_parse_from([
            "modprune",
            "--compute-disabled-modules",
            "/tmp/platform.properties",
            "--registry",
            "a.json",
            "-r",
            "modules/",
            "--root",
            "org.a",
            "--root",
            "org.b",
        ])
        .unwrap();

        assert_eq!(
            cli.compute_disabled_modules.unwrap().to_str().unwrap(),
            "/tmp/platform.properties"
        );
        assert_eq!(cli.registry.len(), 2);
        assert_eq!(cli.roots, vec!["org.a".to_string(), "org.b".to_string()]);
    }

    #[test]
    fn test_cli_validate_command() {
        let cli = Cli::try_parse_from(["modprune", "validate", "/path/to/config.json"]).unwrap();
        match cli.command {
            Some(Commands::Validate { config }) => {
                assert_eq!(config.to_str().unwrap(), "/path/to/config.json");
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_dry_run_is_global() {
        let cli = Cli::try_parse_from(["modprune", "validate", "c.json", "--dry-run"]).unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["modprune", "--bogus"]).is_err());
    }
}
