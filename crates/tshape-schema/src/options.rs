//! Schema evaluation options.

use serde::{Deserialize, Serialize};
use tshape_common::limits::{
    DEFAULT_SCHEMA_DEPTH, MAX_DEFERRED_DEFINITIONS, TEMPLATE_LITERAL_EXPANSION_LIMIT,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaOptions {
    /// Structural depth budget of one evaluation.
    pub max_depth: u32,
    /// Evaluate reads of parameters without a binding to a tagged `unknown`
    /// instead of their declared type.
    pub late_bind_parameters: bool,
    /// Evaluate calls to local functions without a return annotation by
    /// binding their parameters and evaluating their body.
    pub inline_call_bodies: bool,
    pub template_expansion_limit: usize,
    pub max_deferred_definitions: usize,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        SchemaOptions {
            max_depth: DEFAULT_SCHEMA_DEPTH,
            late_bind_parameters: false,
            inline_call_bodies: true,
            template_expansion_limit: TEMPLATE_LITERAL_EXPANSION_LIMIT,
            max_deferred_definitions: MAX_DEFERRED_DEFINITIONS,
        }
    }
}

impl SchemaOptions {
    #[must_use]
    pub fn late_bound(mut self) -> Self {
        self.late_bind_parameters = true;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}
