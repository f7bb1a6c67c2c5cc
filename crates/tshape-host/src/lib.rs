//! Type query interface between the tshape engines and a host type checker.
//!
//! The resolver and the schema evaluator never type-check anything themselves.
//! They ask a `TypeQuery` implementation for symbols, types, signatures and
//! contextual types, and describe host types through the closed `TypeData`
//! model defined here.
//!
//! `MemoryHost` is a complete in-memory implementation. Embedders with their
//! own checker implement `TypeQuery` directly.

pub mod ids;
pub use ids::{SignatureId, SymbolId, TypeId};

pub mod types;
pub use types::{
    ElementFlags, IndexSignature, IntrinsicKind, LiteralValue, ObjectFlags, ObjectShape,
    OrderedFloat, TemplateSpan, TupleElement, TypeData,
};

pub mod symbols;
pub use symbols::{SignatureInfo, SignatureKind, SymbolFlags, SymbolInfo};

pub mod query;
pub use query::TypeQuery;

pub mod printer;
pub use printer::TypePrinter;

pub mod memory;
pub use memory::MemoryHost;
