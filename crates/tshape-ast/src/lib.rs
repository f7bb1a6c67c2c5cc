//! Syntax tree for the tshape crates.
//!
//! This crate provides:
//! - `SyntaxKind` - the closed node-kind enumeration, with an `ALL` table
//! - `TokenKind` - operator and keyword tokens stored inside node payloads
//! - `Node` / `NodeData` - node headers and their typed payloads
//! - `NodeArena` - bottom-up construction with parent links, and typed accessors
//! - shorthand constructors (`const_declaration`, `property_access`, ...) for
//!   trees built programmatically
//!
//! The tree is owned by the host; the resolver and schema evaluator only read it.

pub mod syntax_kind;
pub use syntax_kind::{SyntaxKind, TokenKind};

pub mod flags;
pub use flags::{ModifierFlags, NodeFlags};

pub mod node;
pub use node::*;

pub mod node_arena;
pub use node_arena::NodeArena;

mod node_access;

mod builder;
