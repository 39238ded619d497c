//! Diagnostics for the Caseplant parser.
//!
//! Tokenizing and parsing never abort on malformed input. Every problem is
//! recorded as a [`Diagnostic`] and returned next to whatever model could be
//! built, so callers decide whether output with diagnostics is acceptable.
//!
//! # Example
//!
//! ```
//! # use caseplant_parser::error::{Diagnostic, ErrorCode};
//! # use caseplant_parser::Span;
//!
//! let diag = Diagnostic::warning("module `Billing` is defined multiple times")
//!     .with_code(ErrorCode::W001)
//!     .with_label(Span::new(40..49), "redefined here")
//!     .with_secondary_label(Span::new(7..16), "first defined here")
//!     .with_help("the later case list replaces the earlier one");
//! assert_eq!(diag.offset(), Some(40));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
