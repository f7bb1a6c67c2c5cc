//! tshape: declaration provenance and structural schemas over a typed AST.
//!
//! Two engines read a host program through `tshape_host::TypeQuery`:
//!
//! - the declaration resolver (`resolve_declaration`) answers which
//!   declaration a node ultimately refers to, through imports, re-exports,
//!   inheritance, destructuring and contextual typing;
//! - the schema evaluator (`evaluate_schema`) describes the values a node can
//!   take as a finite `SchemaNode` with a closed definitions table, and
//!   `load_calls` evaluates a function once per call site.
//!
//! This crate re-exports both and adds the ambient pieces around them:
//! tracing setup, JSON configuration, and per-node batch runs.

pub mod batch;
pub use batch::{
    BatchReport, BatchSummary, NodeOutcome, evaluate_schemas, evaluate_schemas_with,
    resolve_declarations,
};

pub mod config;
pub use config::AnalysisConfig;

pub mod tracing_config;

pub use tshape_ast as ast;
pub use tshape_common as common;
pub use tshape_host as host;
pub use tshape_resolver as resolver;
pub use tshape_schema as schema;

pub use tshape_host::{MemoryHost, SymbolId, TypeId, TypeQuery};
pub use tshape_resolver::{
    DeclarationResolver, NodeError, Resolution, ResolveOptions, ResolvedDefinition, ShapeError,
    follow::follow, resolve_declaration,
};
pub use tshape_schema::{
    CallContext, CallInfo, DefinitionKey, EvaluatedSchema, SchemaEvaluator, SchemaFlags,
    SchemaKind, SchemaNode, SchemaOptions, evaluate_schema, evaluate_type_schema, load_calls,
    resolve_parameters_in_schema,
};
