//! localizor - per-directory locale file aggregator
//!
//! Entry point for the CLI application.

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use localizor_core::{LocalizorConfig, SyncController, check_directory, migrate};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, RunArgs};

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let base_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = match &cli.config {
        Some(path) => LocalizorConfig::from_file(path),
        None => LocalizorConfig::load(&base_dir),
    }
    .context("Invalid configuration")?;

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run_sync(config, base_dir, args).await,
        Commands::Migrate { locale, source } => {
            run_migrate(&config, &base_dir, &locale, source.as_deref())
        }
        Commands::Check { dir } => run_check(dir.unwrap_or(base_dir)),
    }
}

async fn run_sync(
    mut config: LocalizorConfig,
    base_dir: PathBuf,
    args: RunArgs,
) -> Result<ExitCode> {
    info!("init localizor@{}", env!("CARGO_PKG_VERSION"));

    if let Some(root) = args.root {
        config = config.with_root(root);
    }
    if args.once {
        config = config.with_watch(false);
    }

    let controller = SyncController::new(config, base_dir).context("Invalid configuration")?;

    tokio::select! {
        result = controller.run() => {
            result.context("Failed to update translations")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_migrate(
    config: &LocalizorConfig,
    base_dir: &Path,
    locale: &str,
    source: Option<&Path>,
) -> Result<ExitCode> {
    let report = migrate(config, base_dir, locale, source)
        .with_context(|| format!("Failed to migrate \"{locale}\" translations"))?;

    for path in &report.written {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_check(dir: PathBuf) -> Result<ExitCode> {
    println!("Scanning {}\n", dir.display());

    let invalid = check_directory(&dir).context("Failed to scan directory")?;
    if invalid.is_empty() {
        println!("All YAML files are valid");
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} invalid YAML file(s):\n", invalid.len());
    for (i, file) in invalid.iter().enumerate() {
        println!("{}. {}", i + 1, file.path.display());
        println!("   Error: {}", file.error);
        if let (Some(line), Some(column)) = (file.line, file.column) {
            println!("   Line: {line}, Column: {column}");
        }
        println!();
    }

    Ok(ExitCode::FAILURE)
}
