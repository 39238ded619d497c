//! Caseplant - translate a terse use-case diagram language into PlantUML.
//!
//! The pipeline is tokenize, parse, render. Parsing recovers from malformed
//! input and reports diagnostics next to a partial model; rendering is total
//! and deterministic.

pub mod config;
pub mod export;

mod error;

pub use caseplant_core::{model, relation};
pub use caseplant_parser::{Diagnostic, ParseError, Parsed};

pub use error::CaseplantError;

use log::{debug, info, trace};

use config::AppConfig;
use model::Diagram;

/// Builder for parsing and rendering Caseplant diagrams.
///
/// # Examples
///
/// ```rust
/// use caseplant::{DiagramBuilder, config::AppConfig};
///
/// let source = "actor 'Clerk' as C; module('Billing') { case 'Pay Invoice' as PI } C -> PI";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Parse source to the diagram model
/// let diagram = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Render the model to PlantUML
/// let text = builder.render(&diagram);
/// assert!(text.contains("C --> PI"));
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse source code into a diagram model, failing on any error.
    ///
    /// Warnings such as redefined modules do not fail the parse.
    ///
    /// # Errors
    ///
    /// Returns [`CaseplantError::Parse`] when tokenizing or parsing recorded
    /// at least one error diagnostic.
    pub fn parse(&self, source: &str) -> Result<Diagram, CaseplantError> {
        let diagram = self
            .parse_lenient(source)
            .into_result()
            .map_err(|err| CaseplantError::new_parse_error(err, source))?;

        debug!("Diagram parsed successfully");
        Ok(diagram)
    }

    /// Parse source code, keeping the partial model when errors occur.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use caseplant::DiagramBuilder;
    ///
    /// let parsed = DiagramBuilder::default().parse_lenient("actor 'A' as A; ; A -> B");
    /// assert!(parsed.has_errors());
    /// assert_eq!(parsed.diagram().relations().len(), 1);
    /// ```
    pub fn parse_lenient(&self, source: &str) -> Parsed {
        info!("Parsing diagram");

        let parsed = caseplant_parser::parse(source);

        debug!(diagnostics = parsed.diagnostics().len(); "Diagram parsed");
        trace!(diagram:? = parsed.diagram(); "Parsed diagram");

        parsed
    }

    /// Render a diagram model to PlantUML source text.
    pub fn render(&self, diagram: &Diagram) -> String {
        info!(
            actors = diagram.actors().count(),
            modules = diagram.modules().count(),
            relations = diagram.relations().len();
            "Rendering PlantUML"
        );

        let text = export::plantuml::render(diagram, self.config.render());

        debug!(bytes = text.len(); "PlantUML rendered successfully");
        text
    }

    /// Parse and render in one step, failing on any error diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`CaseplantError::Parse`] when the source has errors.
    pub fn convert(&self, source: &str) -> Result<String, CaseplantError> {
        let diagram = self.parse(source)?;
        Ok(self.render(&diagram))
    }
}
