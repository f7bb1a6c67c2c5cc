//! Definitions post-pass.
//!
//! After the root schema is built, definitions deferred for lack of depth are
//! resolved with a fresh budget, then the table is cleaned up until nothing
//! changes:
//!
//! 1. definitions not reachable from the root are dropped
//! 2. a definition referenced exactly once is inlined at that reference,
//!    unless the reference sits in its own body or is the root itself
//!
//! The recursion sentinel gets a definition of its own when anything still
//! refers to it, so every reference in the result resolves.

use crate::context::{DefinitionCell, SchemaContext};
use crate::evaluator::SchemaEvaluator;
use crate::schema::{DefinitionKey, SchemaNode};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, warn};
use tshape_resolver::ShapeError;

/// A root schema and the named definitions its references point at.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluatedSchema {
    pub root: SchemaNode,
    pub definitions: IndexMap<DefinitionKey, SchemaNode>,
}

impl EvaluatedSchema {
    pub fn definition(&self, key: DefinitionKey) -> Option<&SchemaNode> {
        self.definitions.get(&key)
    }

    /// References with no definition. Empty for every finalized schema.
    pub fn dangling_references(&self) -> Vec<DefinitionKey> {
        let mut out = Vec::new();
        for key in self
            .root
            .references()
            .into_iter()
            .chain(self.definitions.values().flat_map(SchemaNode::references))
        {
            if !self.definitions.contains_key(&key) && !out.contains(&key) {
                out.push(key);
            }
        }
        out
    }

    /// Number of references to `key` across the root and every definition.
    pub fn reference_count(&self, key: DefinitionKey) -> usize {
        count_references(&self.root, &self.definitions)
            .get(&key)
            .copied()
            .unwrap_or(0)
    }
}

pub fn finalize(
    evaluator: &SchemaEvaluator<'_>,
    root: SchemaNode,
    ctx: &SchemaContext,
) -> Result<EvaluatedSchema, ShapeError> {
    resolve_deferred(evaluator, ctx)?;

    let mut definitions = IndexMap::new();
    for (key, cell) in ctx.take_definitions() {
        match cell {
            DefinitionCell::Done(body) => {
                definitions.insert(key, body);
            }
            DefinitionCell::Building => {
                return Err(ShapeError::CircularDefinition {
                    key: key.to_string(),
                });
            }
            DefinitionCell::NotStarted { .. } => {
                definitions.insert(key, SchemaNode::recursion_limit());
            }
        }
    }

    let mut root = root;
    simplify(&mut root, &mut definitions);

    let mentions_limit = root.mentions(DefinitionKey::RecursionLimit)
        || definitions
            .values()
            .any(|body| body.mentions(DefinitionKey::RecursionLimit));
    if mentions_limit {
        definitions.insert(DefinitionKey::RecursionLimit, SchemaNode::unknown());
    }

    let schema = EvaluatedSchema { root, definitions };
    if let Some(key) = schema.dangling_references().first() {
        return Err(ShapeError::InvariantViolation(format!(
            "reference to {key} has no definition"
        )));
    }
    Ok(schema)
}

/// Build every definition registered while the depth budget was exhausted.
/// Building one may register more; past the cap the rest become the
/// sentinel.
fn resolve_deferred(evaluator: &SchemaEvaluator<'_>, ctx: &SchemaContext) -> Result<(), ShapeError> {
    let cap = ctx.options().max_deferred_definitions;
    let mut resolved = 0usize;
    while let Some((key, ty)) = ctx.next_deferred() {
        if resolved >= cap {
            warn!(parent: ctx.span(), %key, cap, "deferred definition limit reached");
            ctx.set_definition(key, DefinitionCell::Done(SchemaNode::recursion_limit()));
            continue;
        }
        resolved += 1;
        let label = key.to_string();
        ctx.set_definition(key, DefinitionCell::Building);
        let body = evaluator.structural_type(ty, &ctx.restart(&label).descend(&label))?;
        ctx.set_definition(key, DefinitionCell::Done(body));
    }
    if resolved > 0 {
        debug!(parent: ctx.span(), resolved, "deferred definitions resolved");
    }
    Ok(())
}

fn simplify(root: &mut SchemaNode, definitions: &mut IndexMap<DefinitionKey, SchemaNode>) {
    loop {
        let reachable = reachable_keys(root, definitions);
        definitions.retain(|key, _| reachable.contains(key));

        let counts = count_references(root, definitions);
        let root_key = root.reference_key();
        let candidate = definitions
            .iter()
            .find(|(key, body)| {
                counts.get(*key) == Some(&1) && root_key != Some(**key) && !body.mentions(**key)
            })
            .map(|(key, _)| *key);
        let Some(key) = candidate else {
            break;
        };
        let Some(body) = definitions.shift_remove(&key) else {
            break;
        };
        if !root.inline_reference(key, &body) {
            for other in definitions.values_mut() {
                if other.inline_reference(key, &body) {
                    break;
                }
            }
        }
    }
}

fn reachable_keys(
    root: &SchemaNode,
    definitions: &IndexMap<DefinitionKey, SchemaNode>,
) -> FxHashSet<DefinitionKey> {
    let mut seen = FxHashSet::default();
    let mut pending = root.references();
    while let Some(key) = pending.pop() {
        if !seen.insert(key) {
            continue;
        }
        if let Some(body) = definitions.get(&key) {
            pending.extend(body.references());
        }
    }
    seen
}

fn count_references(
    root: &SchemaNode,
    definitions: &IndexMap<DefinitionKey, SchemaNode>,
) -> FxHashMap<DefinitionKey, usize> {
    let mut counts = FxHashMap::default();
    for key in root
        .references()
        .into_iter()
        .chain(definitions.values().flat_map(SchemaNode::references))
    {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
#[path = "../tests/finalize_tests.rs"]
mod tests;
