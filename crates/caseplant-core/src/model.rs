//! Diagram model types.
//!
//! These types are the structured representation produced by the parser and
//! consumed by the renderer.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ lexer
//! Tokens
//!     ↓ parser
//! Diagram Model (these types)
//!     ↓ export
//! PlantUML
//! ```
//!
//! # Ordering
//!
//! [`Diagram`] stores actors and modules in [`IndexMap`]s so that iteration
//! follows declaration order. Re-inserting an existing key replaces the value
//! in place: the entry keeps the position of its first declaration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::relation::Relation;

/// An actor declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    display_name: String,
    alias: Option<String>,
}

impl Actor {
    /// Create a new actor with its quoted label and optional alias.
    pub fn new(display_name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            alias,
        }
    }

    /// Get the human-readable label.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Get the alias, if one was declared.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the text relations use to refer to this actor.
    /// Uses the alias if present, otherwise falls back to the display name.
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.display_name)
    }
}

/// A use case declared inside a [`Module`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    display_name: String,
    alias: Option<String>,
}

impl UseCase {
    /// Create a new use case with its quoted label and optional alias.
    pub fn new(display_name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            alias,
        }
    }

    /// Get the human-readable label.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Get the alias, if one was declared.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the alias if present, otherwise the display name.
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.display_name)
    }
}

/// A named group of use cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    name: String,
    use_cases: Vec<UseCase>,
}

impl Module {
    /// Create a new module owning `use_cases` in declaration order.
    pub fn new(name: impl Into<String>, use_cases: Vec<UseCase>) -> Self {
        Self {
            name: name.into(),
            use_cases,
        }
    }

    /// Get the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the use cases in declaration order.
    pub fn use_cases(&self) -> &[UseCase] {
        &self.use_cases
    }
}

/// The root aggregate produced by one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    actors: IndexMap<String, Actor>,
    modules: IndexMap<String, Module>,
    relations: Vec<Relation>,
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an actor, keyed by its alias or, without one, its display name.
    ///
    /// Returns the actor previously stored under the same key, if any.
    pub fn add_actor(&mut self, actor: Actor) -> Option<Actor> {
        let key = actor.reference().to_string();
        self.actors.insert(key, actor)
    }

    /// Record a module. A module with the same name replaces the earlier
    /// module's use cases and keeps the earlier position.
    ///
    /// Returns the replaced module, if any.
    pub fn add_module(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.name.clone(), module)
    }

    /// Append a relation.
    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Iterate over actors in declaration order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// Look up an actor by alias, or by display name for alias-less actors.
    pub fn actor(&self, key: &str) -> Option<&Actor> {
        self.actors.get(key)
    }

    /// Iterate over modules in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Get relations in declaration order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Returns `true` if the diagram declares nothing.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty() && self.modules.is_empty() && self.relations.is_empty()
    }
}
