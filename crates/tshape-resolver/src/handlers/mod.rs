//! Per-category resolution handlers.
//!
//! Each module adds methods to `DeclarationResolver`; the dispatch table in
//! `resolver.rs` routes every `SyntaxKind` to one of them.

mod class_members;
mod expressions;
mod imports;
mod jsdoc;
mod jsx;
mod literals;
mod references;
mod statements;
