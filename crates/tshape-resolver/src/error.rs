//! Errors raised by the resolver and the schema evaluator.
//!
//! Everything recoverable (unresolved modules, depth exhaustion, cycles through
//! the reference table) is handled in place and logged. What remains here are
//! internal logic errors. They are wrapped once with the node they occurred on
//! so that a failure dozens of frames deep can still be located.

use std::fmt;
use thiserror::Error;
use tshape_ast::{NodeArena, NodeIndex, SyntaxKind};
use tshape_common::Position;
use tshape_common::limits::ERROR_EXCERPT_CHARS;
use tshape_host::SymbolId;

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A node's kind and its payload disagree.
    #[error("expected {expected} payload, found {found}")]
    UnexpectedNodeShape {
        expected: &'static str,
        found: SyntaxKind,
    },

    #[error("symbol {symbol} resolves to a target without a declaration")]
    MissingDeclaration { symbol: SymbolId },

    /// A named type re-entered itself without passing through the definitions
    /// table.
    #[error("circular definition of {key} outside the reference table")]
    CircularDefinition { key: String },

    #[error(transparent)]
    Node(Box<NodeError>),
}

impl ShapeError {
    pub fn unexpected(expected: &'static str, found: SyntaxKind) -> Self {
        ShapeError::UnexpectedNodeShape { expected, found }
    }

    /// Attach node context. An error that already carries node context is
    /// returned unchanged, so the innermost node is the one reported.
    pub fn at_node(self, arena: &NodeArena, node: NodeIndex, history: &str) -> Self {
        if matches!(self, ShapeError::Node(_)) {
            return self;
        }
        let node_kind = arena.kind(node).unwrap_or(SyntaxKind::MissingDeclaration);
        ShapeError::Node(Box::new(NodeError {
            node,
            node_kind,
            file: arena.file_name().to_string(),
            location: arena.position_of(node),
            excerpt: excerpt(arena.node_text(node)),
            history: history.to_string(),
            cause: self,
        }))
    }

    pub fn node_error(&self) -> Option<&NodeError> {
        match self {
            ShapeError::Node(inner) => Some(inner),
            _ => None,
        }
    }

    /// The error without node context.
    pub fn root_cause(&self) -> &ShapeError {
        match self {
            ShapeError::Node(inner) => inner.cause.root_cause(),
            other => other,
        }
    }
}

/// An error scoped to the node it occurred on.
#[derive(Debug, Error)]
pub struct NodeError {
    pub node: NodeIndex,
    pub node_kind: SyntaxKind,
    pub file: String,
    pub location: Position,
    pub excerpt: String,
    /// Evaluation trace accumulated by the schema context, empty for the
    /// resolver.
    pub history: String,
    #[source]
    pub cause: ShapeError,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{} `{}`: {}",
            self.node_kind, self.file, self.location, self.excerpt, self.cause
        )?;
        if !self.history.is_empty() {
            write!(f, "\n  trace: {}", self.history)?;
        }
        Ok(())
    }
}

fn excerpt(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() <= ERROR_EXCERPT_CHARS {
        return line.to_string();
    }
    let mut out: String = line.chars().take(ERROR_EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
#[path = "../tests/error_tests.rs"]
mod tests;
