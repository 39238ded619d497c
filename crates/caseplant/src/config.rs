//! Configuration types for Caseplant rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by the command-line tool or built directly by host code.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`RenderConfig`] - Controls the shape of the generated PlantUML.
//!
//! # Example
//!
//! ```
//! # use caseplant::config::{AppConfig, ContainerKind};
//! let config = AppConfig::default();
//! assert_eq!(config.render().container(), ContainerKind::Package);
//! assert!(config.render().title().is_none());
//! ```

use std::fmt;

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    pub fn new(render: RenderConfig) -> Self {
        Self { render }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }
}

/// PlantUML block used to group the use cases of one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    #[default]
    Package,
    Rectangle,
    Frame,
}

impl ContainerKind {
    /// The PlantUML keyword that opens the block.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Rectangle => "rectangle",
            Self::Frame => "frame",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Layout direction hint passed through to PlantUML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    TopToBottom,
    LeftToRight,
}

impl Direction {
    /// The PlantUML directive for this direction.
    pub fn directive(self) -> &'static str {
        match self {
            Self::TopToBottom => "top to bottom direction",
            Self::LeftToRight => "left to right direction",
        }
    }
}

/// Options that shape the rendered PlantUML text.
///
/// Unset fields emit nothing, so a default config renders only what the
/// diagram itself declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    container: ContainerKind,

    /// Emitted as a direction directive when set.
    #[serde(default)]
    direction: Option<Direction>,

    #[serde(default)]
    title: Option<String>,
}

impl RenderConfig {
    pub fn new(
        container: ContainerKind,
        direction: Option<Direction>,
        title: Option<String>,
    ) -> Self {
        Self {
            container,
            direction,
            title,
        }
    }

    pub fn container(&self) -> ContainerKind {
        self.container
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}
