//! Caseplant CLI library
//!
//! This module contains the core CLI logic for the Caseplant converter.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{error, info, warn};

use caseplant::{CaseplantError, DiagramBuilder, ParseError};

use error_adapter::diagnostics_to_reportables;

/// Run the Caseplant CLI application
///
/// This function converts the input file to PlantUML and writes the result
/// to the output file, or to standard output with `--stdout`.
///
/// Diagnostics are reported as they are found. Without `--strict` the
/// output is written even when the input had errors.
///
/// # Errors
///
/// Returns `CaseplantError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parse errors, in strict mode only
pub fn run(args: &Args) -> Result<(), CaseplantError> {
    let output_path = args
        .output
        .as_ref()
        .map_or_else(|| default_output_path(&args.input), PathBuf::from);

    info!(
        input_path = args.input,
        output_path = output_path.display().to_string(),
        strict = args.strict;
        "Processing diagram"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let parsed = builder.parse_lenient(&source);

    if args.strict && parsed.has_errors() {
        let (_, diagnostics) = parsed.into_parts();
        return Err(CaseplantError::new_parse_error(
            ParseError::new(diagnostics),
            source,
        ));
    }

    for reportable in diagnostics_to_reportables(parsed.diagnostics(), &source) {
        if reportable.is_error() {
            error!("{}", reportable.render());
        } else {
            warn!("{}", reportable.render());
        }
    }

    let text = builder.render(parsed.diagram());

    if args.stdout {
        print!("{text}");
        info!("PlantUML written to standard output");
    } else {
        fs::write(&output_path, text)?;
        info!(output_file = output_path.display().to_string(); "PlantUML exported successfully");
    }

    Ok(())
}

/// The output path used when none is given: the input with a `puml` extension.
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension("puml")
}
