//! Command-line argument definitions for the Caseplant CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, error policy and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Caseplant converter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input use-case diagram file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output PlantUML file
    ///
    /// Defaults to the input path with its extension replaced by `puml`.
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Fail without writing output when the input has errors
    #[arg(long)]
    pub strict: bool,

    /// Print the PlantUML to standard output instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}
