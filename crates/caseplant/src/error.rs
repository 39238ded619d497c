//! Error types for Caseplant operations.
//!
//! This module provides the main error type [`CaseplantError`] which wraps
//! the error conditions that can occur while converting a diagram.

use std::io;

use thiserror::Error;

use caseplant_parser::ParseError;

/// The main error type for Caseplant operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so
/// reporters can show the offending lines.
#[derive(Debug, Error)]
pub enum CaseplantError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CaseplantError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
