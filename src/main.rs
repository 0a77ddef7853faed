//! modprune - Main entry point
//!
//! Parses arguments, loads the module universe and writes `disabled.modules`.
//! Log output and diagnostics go to stderr; only the dry-run result goes to
//! stdout.

use anyhow::Context;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use modprune::cli::{Cli, Commands};
use modprune::{
    ComputeConfig, ComputeOptions, DISABLED_MODULES_KEY, ModpruneError, ModuleRegistry,
    compute_disabled_modules,
};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the default `info` level.
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<ModpruneError>()
                .map(ModpruneError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(Commands::Validate { config }) = &cli.command {
        info!("Validating configuration file: {:?}", config);
        let loaded = ComputeConfig::load_from_file(config)?;
        loaded.validate()?;
        println!("✓ Configuration file is valid: {:?}", config);
        return Ok(());
    }

    let Some(target) = cli.compute_disabled_modules else {
        debug!("No --compute-disabled-modules target given, nothing to do");
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => ComputeConfig::load_from_file(path)?,
        None => ComputeConfig::default(),
    }
    .with_overrides(&cli.roots, &cli.registry);
    config.validate().context("Invalid configuration")?;

    if config.registries.is_empty() {
        return Err(ModpruneError::config("no module registry supplied (use --registry)").into());
    }

    let registry = ModuleRegistry::load_paths(&config.registries)?;
    info!(
        "Loaded {} modules from {} registries",
        registry.len(),
        config.registries.len()
    );

    let outcome = compute_disabled_modules(
        &registry,
        &config.root_modules,
        &target,
        ComputeOptions {
            dry_run: cli.dry_run,
        },
    )?;

    if cli.dry_run {
        println!("{}={}", DISABLED_MODULES_KEY, outcome.disabled_value());
    }

    Ok(())
}
