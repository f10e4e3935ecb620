use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "localizor",
    version,
    about = "Aggregate per-directory locale files into one translation file"
)]
pub struct Cli {
    /// Run-control file to use instead of ./.localizorrc
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the translation file, then rebuild on every change (default)
    Run(RunArgs),

    /// Write an assembled translation file back into the locale files
    Migrate {
        /// Locale section to read from the source document
        locale: String,

        /// Assembled document to read (defaults to <root>/locales/translation.<locale>.<ext>)
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,
    },

    /// Report empty or malformed YAML files
    Check {
        /// Directory to scan (defaults to the working directory)
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Directory to scan instead of the configured root
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Build once and exit, even if watch mode is configured
    #[arg(long)]
    pub once: bool,
}
