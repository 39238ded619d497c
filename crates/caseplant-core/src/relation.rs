//! Relations between diagram elements.
//!
//! The operator vocabulary is closed. Each [`RelationOperator`] maps one DSL
//! symbol to one relationship kind; the renderer decides how a kind looks in
//! the target notation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of relationship a relation statement expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationOperator {
    /// `--` plain association.
    Association,
    /// `-e>` extension relationship.
    Extend,
    /// `-i>` inclusion relationship.
    Include,
    /// `->>` generalization.
    Generalization,
    /// `->` directed association.
    Directed,
}

impl RelationOperator {
    /// Every operator, ordered so that longer symbols come before shorter
    /// symbols sharing a prefix.
    pub const ALL: [RelationOperator; 5] = [
        RelationOperator::Generalization,
        RelationOperator::Extend,
        RelationOperator::Include,
        RelationOperator::Directed,
        RelationOperator::Association,
    ];

    /// Returns the DSL symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            RelationOperator::Association => "--",
            RelationOperator::Extend => "-e>",
            RelationOperator::Include => "-i>",
            RelationOperator::Generalization => "->>",
            RelationOperator::Directed => "->",
        }
    }
}

impl fmt::Display for RelationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One side of a relation.
///
/// Operands are not checked against declared actors or use cases; any text
/// is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// A bare identifier, normally an alias.
    Alias(String),
    /// Quoted label text.
    Label(String),
}

impl Operand {
    /// Returns the operand text without any quoting.
    pub fn text(&self) -> &str {
        match self {
            Operand::Alias(text) | Operand::Label(text) => text,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Alias(alias) => write!(f, "{alias}"),
            Operand::Label(label) => write!(f, "\"{label}\""),
        }
    }
}

/// A typed relation between two operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    left: Operand,
    operator: RelationOperator,
    right: Operand,
}

impl Relation {
    /// Create a new relation.
    pub fn new(left: Operand, operator: RelationOperator, right: Operand) -> Self {
        Self {
            left,
            operator,
            right,
        }
    }

    /// Get the left-hand operand.
    pub fn left(&self) -> &Operand {
        &self.left
    }

    /// Get the relation operator.
    pub fn operator(&self) -> RelationOperator {
        self.operator
    }

    /// Get the right-hand operand.
    pub fn right(&self) -> &Operand {
        &self.right
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}
