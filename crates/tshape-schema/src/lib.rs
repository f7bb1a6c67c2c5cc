//! Type Schema Evaluator.
//!
//! Turns a node or a host type into a `SchemaNode`: a closed, serializable
//! description of the values it can take. Constants propagate through
//! declarations, operators fold over literals, calls to local functions are
//! evaluated in place, and named types become references into a definitions
//! table so that recursive types stay finite.
//!
//! - `schema` - the schema model
//! - `algebra` - union/intersection normalization and operator folding
//! - `context` - per-branch evaluation context over shared session tables
//! - `evaluator` - `SchemaEvaluator`, the node and type dispatch
//! - `call_context` - call-site driven evaluation (`load_calls`)
//! - `finalize` - the definitions post-pass

pub mod algebra;

pub mod call_context;
pub use call_context::{
    CallContext, CallInfo, CallSiteIndex, load_calls, resolve_parameters_in_schema,
};

pub mod context;
pub use context::{DefinitionCell, SchemaContext};

pub mod evaluator;
pub use evaluator::{SchemaEvaluator, SchemaResult};

pub mod finalize;
pub use finalize::EvaluatedSchema;

pub mod options;
pub use options::SchemaOptions;

pub mod schema;
pub use schema::{
    DefinitionKey, FunctionParameter, IndexKey, SchemaFlags, SchemaKind, SchemaNode, TemplatePart,
};

use tshape_ast::NodeIndex;
use tshape_host::{TypeId, TypeQuery};
use tshape_resolver::{ResolveOptions, ShapeError};

impl SchemaEvaluator<'_> {
    /// Evaluate `node` in a fresh session and finalize its definitions.
    /// `None` when the node has no value (a statement, a clause).
    pub fn evaluate_schema(
        &self,
        node: NodeIndex,
        options: SchemaOptions,
    ) -> Result<Option<EvaluatedSchema>, ShapeError> {
        let ctx = SchemaContext::new(options);
        let _entered = ctx.span().clone().entered();
        let Some(root) = self.evaluate_node(node, &ctx)? else {
            return Ok(None);
        };
        finalize::finalize(self, root, &ctx).map(Some)
    }

    /// Evaluate a host type in a fresh session and finalize its definitions.
    pub fn evaluate_type_schema(
        &self,
        ty: TypeId,
        options: SchemaOptions,
    ) -> Result<EvaluatedSchema, ShapeError> {
        let ctx = SchemaContext::new(options);
        let _entered = ctx.span().clone().entered();
        let root = self.evaluate_type(ty, &ctx)?;
        finalize::finalize(self, root, &ctx)
    }
}

/// Evaluate the schema of `node` with a fresh evaluator.
pub fn evaluate_schema(
    host: &dyn TypeQuery,
    node: NodeIndex,
    options: SchemaOptions,
) -> Result<Option<EvaluatedSchema>, ShapeError> {
    SchemaEvaluator::new(host, ResolveOptions::default()).evaluate_schema(node, options)
}

/// Evaluate the schema of a host type with a fresh evaluator.
pub fn evaluate_type_schema(
    host: &dyn TypeQuery,
    ty: TypeId,
    options: SchemaOptions,
) -> Result<EvaluatedSchema, ShapeError> {
    SchemaEvaluator::new(host, ResolveOptions::default()).evaluate_type_schema(ty, options)
}
