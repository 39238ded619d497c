//! # Caseplant Parser
//!
//! Parser for the Caseplant use-case diagram language. This crate turns
//! source text into a [`caseplant_core::model::Diagram`] plus the
//! diagnostics recorded along the way.
//!
//! ## Usage
//!
//! ```
//! # use caseplant_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         actor 'Clerk' as C;
//!         module('Billing') { case 'Pay Invoice' as PI }
//!         C -> PI
//!     "#;
//!
//!     let diagram = parse(source).into_result()?;
//!     assert_eq!(diagram.relations().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod error;
mod lexer;
mod parser;
mod span;
mod tokens;

pub use error::{Diagnostic, ParseError};
pub use span::{Span, Spanned};

use caseplant_core::model::Diagram;

/// The outcome of parsing one source text.
///
/// A `Parsed` always carries a model. When the source contained errors the
/// model holds every statement that parsed and the errors are listed in
/// [`Parsed::diagnostics`].
#[derive(Debug, Clone)]
pub struct Parsed {
    diagram: Diagram,
    diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Diagnostics from tokenizing and parsing, ordered by source offset.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }

    pub fn into_parts(self) -> (Diagram, Vec<Diagnostic>) {
        (self.diagram, self.diagnostics)
    }

    /// Treat any error diagnostic as failure.
    ///
    /// Warnings alone do not fail; they are dropped along with the rest of
    /// the diagnostics on success.
    pub fn into_result(self) -> Result<Diagram, ParseError> {
        if self.has_errors() {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagram)
        }
    }
}

/// Parse source text into a diagram model.
///
/// This is the main entry point for parsing Caseplant source code:
///
/// 1. **Tokenize** - Convert source text to tokens, skipping bad characters
/// 2. **Parse** - Build the model statement by statement, recovering from
///    syntax errors
///
/// Parsing never fails outright. Diagnostics from both phases are merged in
/// source order.
///
/// # Example
///
/// ```
/// # use caseplant_parser::parse;
///
/// let parsed = parse("actor 'Clerk' as C; C -> ???");
/// assert!(parsed.has_errors());
/// assert_eq!(parsed.diagram().actors().count(), 1);
/// ```
pub fn parse(source: &str) -> Parsed {
    // Step 1: Tokenize
    let (tokens, mut diagnostics) = lexer::tokenize(source);

    // Step 2: Parse
    let (diagram, parse_diagnostics) = parser::build_diagram(&tokens);

    diagnostics.extend(parse_diagnostics);
    diagnostics.sort_by_key(|d| d.offset().unwrap_or(usize::MAX));

    log::debug!(
        actors = diagram.actors().count(),
        modules = diagram.modules().count(),
        relations = diagram.relations().len(),
        diagnostics = diagnostics.len();
        "Parsed source"
    );

    Parsed {
        diagram,
        diagnostics,
    }
}
