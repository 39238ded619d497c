//! Export functionality for Caseplant diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a diagram model into an output format. It is the final stage in
//! the Caseplant processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ tokenize + parse
//! Diagram Model
//!     ↓ export (this module)
//! Output Text
//! ```
//!
//! # Available Backends
//!
//! - [`plantuml`]: PlantUML source via [`plantuml::PlantUml`]

/// PlantUML export backend.
pub mod plantuml;

use caseplant_core::model::Diagram;

/// Abstraction for diagram export backends.
///
/// Exporting is total: every diagram model the parser can build has an
/// output, so implementors return the text directly.
pub trait Exporter {
    /// Exports a diagram to the backend's output format.
    fn export_diagram(&self, diagram: &Diagram) -> String;
}
