//! Call-site driven evaluation.
//!
//! `load_calls` evaluates every call of a function: its arguments in the
//! caller's scope, and its body with the parameters bound to them. Arguments
//! that still depend on the caller's own parameters are rebound through the
//! caller's call sites, so a value threaded through several functions comes
//! out concrete wherever the outermost call passes a literal.

use crate::algebra;
use crate::context::SchemaContext;
use crate::evaluator::SchemaEvaluator;
use crate::options::SchemaOptions;
use crate::schema::{SchemaFlags, SchemaKind, SchemaNode};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, debug_span, trace};
use tshape_ast::{NodeIndex, NodeList, SyntaxKind};
use tshape_common::limits::MAX_CALL_VARIANTS;
use tshape_host::{SymbolId, TypeQuery};
use tshape_resolver::ShapeError;
use tshape_resolver::classify::unwrap_symbol_target;

/// Call and `new` expressions of a tree, grouped by callee symbol.
#[derive(Debug, Default)]
pub struct CallSiteIndex {
    calls: FxHashMap<SymbolId, Vec<NodeIndex>>,
}

impl CallSiteIndex {
    pub fn build(host: &dyn TypeQuery) -> Self {
        let arena = host.arena();
        let mut calls: FxHashMap<SymbolId, Vec<NodeIndex>> = FxHashMap::default();
        for index in arena.indices() {
            let Some(node) = arena.get(index) else {
                continue;
            };
            if !matches!(node.kind, SyntaxKind::CallExpression | SyntaxKind::NewExpression) {
                continue;
            }
            let Some(call) = arena.get_call_expr(node) else {
                continue;
            };
            let callee = arena.skip_outer_expressions(call.expression);
            let symbol = host.symbol_at(callee).or_else(|| {
                let access = arena.get(callee).and_then(|c| arena.get_access_expr(c))?;
                host.symbol_at(access.name_or_argument)
            });
            if let Some(symbol) = symbol {
                calls
                    .entry(unwrap_symbol_target(host, symbol))
                    .or_default()
                    .push(index);
            }
        }
        CallSiteIndex { calls }
    }

    pub fn calls_of(&self, symbol: SymbolId) -> &[NodeIndex] {
        self.calls.get(&symbol).map_or(&[], Vec::as_slice)
    }

    /// Total number of indexed call sites.
    pub fn len(&self) -> usize {
        self.calls.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// One evaluated call of a function.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallInfo {
    pub call: NodeIndex,
    pub arguments: Vec<SchemaNode>,
    pub return_schema: SchemaNode,
}

/// Session state of call-site evaluation. Parameters are always late-bound
/// here: an argument that reads a caller parameter stays open until the
/// caller's own calls are loaded.
#[derive(Clone, Debug)]
pub struct CallContext {
    schema: SchemaContext,
    index: Rc<CallSiteIndex>,
    cache: Rc<RefCell<FxHashMap<SymbolId, Vec<CallInfo>>>>,
}

impl CallContext {
    pub fn new(host: &dyn TypeQuery, options: SchemaOptions) -> Self {
        CallContext::with_index(options, Rc::new(CallSiteIndex::build(host)))
    }

    pub fn with_index(options: SchemaOptions, index: Rc<CallSiteIndex>) -> Self {
        let options = options.late_bound();
        let span = debug_span!("load_calls", call_sites = index.len());
        CallContext {
            schema: SchemaContext::with_span(options, span),
            index,
            cache: Rc::new(RefCell::new(FxHashMap::default())),
        }
    }

    #[inline]
    pub fn schema(&self) -> &SchemaContext {
        &self.schema
    }

    #[inline]
    pub fn index(&self) -> &CallSiteIndex {
        &self.index
    }
}

/// Evaluate every call of `symbol`. Returns nothing for symbols that are not
/// functions with a body, and for a function whose calls are already being
/// loaded further up the stack.
pub fn load_calls(
    evaluator: &SchemaEvaluator<'_>,
    symbol: SymbolId,
    cx: &CallContext,
) -> Result<Vec<CallInfo>, ShapeError> {
    let host = evaluator.host();
    let symbol = unwrap_symbol_target(host, symbol);
    let ctx = cx.schema();
    if ctx.is_handling(symbol) {
        trace!(parent: ctx.span(), %symbol, "calls already being loaded");
        return Ok(Vec::new());
    }
    if let Some(cached) = cx.cache.borrow().get(&symbol) {
        return Ok(cached.clone());
    }
    let Some(function) = function_of(evaluator, symbol) else {
        debug!(parent: ctx.span(), %symbol, "not a function with a body");
        return Ok(Vec::new());
    };

    ctx.enter_symbol(symbol);
    let result = load_calls_of(evaluator, symbol, function, cx);
    ctx.leave_symbol(symbol);
    let calls = result?;

    // Results computed under another function's guard may be missing the
    // calls that guard suppressed.
    if ctx.handled_symbols() == 0 {
        cx.cache.borrow_mut().insert(symbol, calls.clone());
    }
    Ok(calls)
}

fn load_calls_of(
    evaluator: &SchemaEvaluator<'_>,
    symbol: SymbolId,
    function: NodeIndex,
    cx: &CallContext,
) -> Result<Vec<CallInfo>, ShapeError> {
    let arena = evaluator.arena();
    let ctx = cx.schema();
    let (required, maximum) = evaluator.arity(function);
    let mut out = Vec::new();
    for &call in cx.index().calls_of(symbol) {
        let arguments = arena
            .get(call)
            .and_then(|n| arena.get_call_expr(n))
            .and_then(|c| c.arguments.as_ref());
        let count = arguments.map_or(0, NodeList::len);
        if count < required || maximum.is_some_and(|maximum| count > maximum) {
            debug!(parent: ctx.span(), %symbol, call = call.0, count, "skipping call with mismatched arity");
            continue;
        }

        let call_ctx = ctx.unwrap_into(&format!("call {}", call.0));
        let values = evaluator
            .call_arguments(arguments, &call_ctx)
            .map_err(|err| err.at_node(arena, call, call_ctx.history()))?;
        for values in rebind_through_callers(evaluator, values, cx)? {
            let return_schema = evaluator
                .evaluate_call_body(function, values.clone(), &call_ctx)
                .map_err(|err| err.at_node(arena, call, call_ctx.history()))?;
            out.push(CallInfo {
                call,
                arguments: values,
                return_schema,
            });
        }
    }
    trace!(parent: ctx.span(), %symbol, calls = out.len(), "calls loaded");
    Ok(out)
}

/// Replace unbound caller parameters in `values` with what the caller's own
/// call sites pass. One variant per caller call; unchanged when the caller
/// is never called.
fn rebind_through_callers(
    evaluator: &SchemaEvaluator<'_>,
    values: Vec<SchemaNode>,
    cx: &CallContext,
) -> Result<Vec<Vec<SchemaNode>>, ShapeError> {
    let arena = evaluator.arena();
    let mut owners: Vec<NodeIndex> = Vec::new();
    for value in &values {
        for parameter in value.unbound_parameters() {
            let owner = arena.parent_of(parameter);
            if owner.is_some() && !owners.contains(&owner) {
                owners.push(owner);
            }
        }
    }

    let mut variants = vec![values];
    for owner in owners {
        let Some(owner_symbol) = function_symbol(evaluator, owner) else {
            continue;
        };
        let outer = load_calls(evaluator, owner_symbol, cx)?;
        if outer.is_empty() {
            continue;
        }
        let mut next = Vec::with_capacity(variants.len() * outer.len());
        'outer: for info in &outer {
            let bindings: FxHashMap<NodeIndex, SchemaNode> = evaluator
                .bind_parameters(owner, info.arguments.clone(), cx.schema())?
                .into_iter()
                .collect();
            for variant in &variants {
                if next.len() >= MAX_CALL_VARIANTS {
                    debug!(parent: cx.schema().span(), "call variant limit reached");
                    break 'outer;
                }
                next.push(
                    variant
                        .iter()
                        .map(|value| {
                            resolve_parameters_in_schema(value, &bindings, cx.schema().options())
                        })
                        .collect(),
                );
            }
        }
        variants = next;
    }
    Ok(variants)
}

/// The function node behind a function symbol: a declaration with a body,
/// or a variable/property holding a function expression.
fn function_of(evaluator: &SchemaEvaluator<'_>, symbol: SymbolId) -> Option<NodeIndex> {
    let arena = evaluator.arena();
    let declaration = evaluator.host().symbol_info(symbol)?.primary_declaration();
    let node = arena.get(declaration)?;
    let function = match node.kind {
        SyntaxKind::VariableDeclaration
        | SyntaxKind::PropertyAssignment
        | SyntaxKind::PropertyDeclaration => {
            arena.skip_outer_expressions(arena.initializer_of(declaration))
        }
        _ => declaration,
    };
    let data = arena.get(function).and_then(|n| arena.get_function(n))?;
    data.body.is_some().then_some(function)
}

/// Symbol a function is called through.
fn function_symbol(evaluator: &SchemaEvaluator<'_>, function: NodeIndex) -> Option<SymbolId> {
    let host = evaluator.host();
    let arena = evaluator.arena();
    let symbol = host.symbol_at(function).or_else(|| {
        let holder = arena.parent_of(function);
        let holds_function = arena.skip_outer_expressions(arena.initializer_of(holder)) == function;
        if holds_function { host.symbol_at(holder) } else { None }
    })?;
    Some(unwrap_symbol_target(host, symbol))
}

/// Substitute bound parameters into `schema` and fold whatever became
/// concrete: operators, templates, index accesses, unions and
/// intersections. Template expansion is bounded by
/// `options.template_expansion_limit`.
pub fn resolve_parameters_in_schema(
    schema: &SchemaNode,
    bindings: &FxHashMap<NodeIndex, SchemaNode>,
    options: &SchemaOptions,
) -> SchemaNode {
    if schema.is_unbound() {
        return match bindings.get(&schema.node) {
            Some(bound) => {
                let mut flags = schema.flags;
                flags.remove(SchemaFlags::UNBOUND_PARAMETER);
                bound.clone().with_flags(flags)
            }
            None => schema.clone(),
        };
    }
    if !schema.has_unbound() {
        return schema.clone();
    }
    let mut out = schema.clone();
    for child in out.children_mut() {
        *child = resolve_parameters_in_schema(child, bindings, options);
    }
    refold(out, options)
}

fn refold(schema: SchemaNode, options: &SchemaOptions) -> SchemaNode {
    let SchemaNode {
        kind,
        node,
        flags,
        symbol,
    } = schema;
    let mut folded = match kind {
        SchemaKind::BinaryExpression {
            operator,
            left,
            right,
        } => algebra::fold_binary(operator, *left, *right),
        SchemaKind::TemplateLiteral { parts } => {
            algebra::fold_template(parts, options.template_expansion_limit)
        }
        SchemaKind::IndexAccess { object, index } => algebra::index_access(*object, *index),
        SchemaKind::Union { items } => algebra::union(items),
        SchemaKind::Intersection { items } => algebra::intersection(items),
        kind => SchemaNode::new(kind),
    };
    folded.flags |= flags;
    if folded.node.is_none() {
        folded.node = node;
    }
    if folded.symbol.is_none() {
        folded.symbol = symbol;
    }
    folded
}

#[cfg(test)]
#[path = "../tests/call_context_tests.rs"]
mod tests;
