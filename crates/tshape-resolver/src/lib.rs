//! Declaration provenance for TS-like syntax trees.
//!
//! Given any node, `DeclarationResolver` answers "which declaration does this
//! ultimately refer to": it chases imports, re-exports, inheritance,
//! destructuring and contextual typing down to a `ResolvedDefinition`.
//! `follow` unwraps alias and transient symbols to the declaration they stand
//! for.
//!
//! The resolver only reads the host through `tshape_host::TypeQuery`.

pub mod classify;

pub mod definition;
pub use definition::{LazyType, Resolution, ResolveOptions, ResolvedDefinition, TypeSource};

pub mod error;
pub use error::{NodeError, ShapeError};

pub mod follow;

pub mod guard;
pub use guard::{RecursionGuard, RecursionResult};

mod handlers;

pub mod resolver;
pub use resolver::{DeclarationResolver, ResolveResult, resolve_declaration};
