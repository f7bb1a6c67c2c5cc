//! Function values, inline call evaluation and parameter binding.
//!
//! A call to a local function without a return annotation is evaluated by
//! binding the callee's parameters to the argument schemas and evaluating
//! the callee's `return` statements under those bindings. Everything else
//! falls back to the host's resolved signature.

use super::{SchemaEvaluator, SchemaResult};
use crate::algebra;
use crate::context::SchemaContext;
use crate::schema::{FunctionParameter, SchemaFlags, SchemaKind, SchemaNode};
use tracing::trace;
use tshape_ast::{ModifierFlags, NodeIndex, NodeList, SyntaxKind};
use tshape_common::limits::MAX_INLINE_CALL_DEPTH;
use tshape_host::{ElementFlags, IntrinsicKind, SymbolId};
use tshape_resolver::{RecursionResult, ShapeError};

impl SchemaEvaluator<'_> {
    // =========================================================================
    // Parameters
    // =========================================================================

    /// Value of a parameter read: its binding, else a late-bound marker, else
    /// its declared type.
    pub(crate) fn parameter_value(
        &self,
        parameter: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        if let Some(bound) = ctx.binding(parameter) {
            return Ok(bound.clone());
        }
        if ctx.options().late_bind_parameters {
            return Ok(SchemaNode::unbound_parameter(parameter));
        }
        self.declared_parameter_type(parameter, ctx)
    }

    fn declared_parameter_type(
        &self,
        parameter: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let annotation = self.arena().type_annotation_of(parameter);
        if annotation.is_some() {
            return self.annotation_type(annotation, ctx);
        }
        self.evaluate_type(self.host.type_at(parameter), ctx)
    }

    /// Bind the parameters of `function` to `arguments`, in order. A rest
    /// parameter takes the remaining arguments as a tuple; a missing or
    /// `undefined` argument takes the parameter's default.
    pub(crate) fn bind_parameters(
        &self,
        function: NodeIndex,
        arguments: Vec<SchemaNode>,
        ctx: &SchemaContext,
    ) -> Result<Vec<(NodeIndex, SchemaNode)>, ShapeError> {
        let arena = self.arena();
        let Some(data) = arena.get(function).and_then(|n| arena.get_function(n)) else {
            return Err(self.shape_error("function", function));
        };
        let mut arguments = arguments.into_iter();
        let mut bound: Vec<(NodeIndex, SchemaNode)> = Vec::with_capacity(data.parameters.len());
        for parameter in data.parameters.iter() {
            let Some(param) = arena.get(parameter).and_then(|n| arena.get_parameter(n)) else {
                continue;
            };
            if param.dot_dot_dot_token {
                let items: Vec<SchemaNode> = arguments.by_ref().collect();
                let element_flags = vec![ElementFlags::REQUIRED; items.len()];
                bound.push((
                    parameter,
                    SchemaNode::new(SchemaKind::Tuple {
                        items,
                        element_flags,
                    }),
                ));
                break;
            }
            let argument = arguments
                .next()
                .filter(|argument| !argument.is_primitive(IntrinsicKind::Undefined));
            let value = match argument {
                Some(argument) => argument,
                None if param.initializer.is_some() => {
                    let scope = ctx.with_bindings(bound.iter().cloned());
                    self.descend_or_undefined(param.initializer, &scope, "default")?
                }
                None => SchemaNode::primitive(IntrinsicKind::Undefined),
            };
            bound.push((parameter, value));
        }
        Ok(bound)
    }

    /// Number of arguments `function` accepts: (required, maximum). The
    /// maximum is `None` with a rest parameter.
    pub(crate) fn arity(&self, function: NodeIndex) -> (usize, Option<usize>) {
        let arena = self.arena();
        let Some(data) = arena.get(function).and_then(|n| arena.get_function(n)) else {
            return (0, Some(0));
        };
        let mut required = 0;
        let mut maximum = Some(0);
        for parameter in data.parameters.iter() {
            let Some(param) = arena.get(parameter).and_then(|n| arena.get_parameter(n)) else {
                continue;
            };
            if param.dot_dot_dot_token {
                maximum = None;
                break;
            }
            maximum = maximum.map(|m| m + 1);
            if !param.question_token && param.initializer.is_none() {
                required = maximum.unwrap_or(required);
            }
        }
        (required, maximum)
    }

    // =========================================================================
    // Function values
    // =========================================================================

    pub(crate) fn function_value(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        match ctx.enter_declaration(node) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(parent: ctx.span(), node = node.0, "function value refers to itself");
                return self.evaluate_type(self.host.type_at(node), ctx);
            }
            RecursionResult::DepthExceeded => return Ok(SchemaNode::recursion_limit()),
        }
        let result = self.function_schema(node, ctx);
        ctx.leave_declaration(node);
        result
    }

    fn function_schema(&self, node: NodeIndex, ctx: &SchemaContext) -> Result<SchemaNode, ShapeError> {
        let arena = self.arena();
        let Some(data) = arena.get(node).and_then(|n| arena.get_function(n)) else {
            return Err(self.shape_error("function", node));
        };
        if ctx.is_exhausted() {
            return Ok(SchemaNode::recursion_limit());
        }
        let inner = ctx.descend(arena.name_text(data.name).unwrap_or("function"));

        let mut parameters = Vec::with_capacity(data.parameters.len());
        for (position, parameter) in data.parameters.iter().enumerate() {
            let Some(param) = arena.get(parameter).and_then(|n| arena.get_parameter(n)) else {
                continue;
            };
            let mut schema = self.declared_parameter_type(parameter, &inner)?;
            if param.question_token || param.initializer.is_some() {
                schema = schema.with_flags(SchemaFlags::OPTIONAL);
            }
            if param.dot_dot_dot_token {
                schema = schema.with_flags(SchemaFlags::REST);
            }
            let name = match arena.name_text(param.name) {
                Some(name) => name.to_string(),
                None => format!("arg{position}"),
            };
            parameters.push(FunctionParameter { name, schema });
        }

        let return_type = self.function_return(node, &inner)?;
        Ok(SchemaNode::new(SchemaKind::Function {
            parameters,
            return_type: Box::new(return_type),
        }))
    }

    /// Declared return type, else the value of the body.
    pub(crate) fn function_return(
        &self,
        function: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let arena = self.arena();
        let Some(data) = arena.get(function).and_then(|n| arena.get_function(n)) else {
            return Err(self.shape_error("function", function));
        };
        if data.type_annotation.is_some() {
            return self.annotation_type(data.type_annotation, ctx);
        }
        if data.body.is_some() {
            return self.body_return(function, ctx);
        }
        self.signature_return(function, ctx)
    }

    fn signature_return(&self, function: NodeIndex, ctx: &SchemaContext) -> Result<SchemaNode, ShapeError> {
        Ok(self
            .call_return_of_type(self.host.type_at(function), ctx)?
            .unwrap_or_else(SchemaNode::unknown))
    }

    /// Union of the values of every `return` in the body. A body without
    /// one returns `void`. Async functions and generators return whatever
    /// their signature says.
    pub(crate) fn body_return(
        &self,
        function: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let arena = self.arena();
        let Some(node) = arena.get(function) else {
            return Ok(SchemaNode::unknown());
        };
        let Some(data) = arena.get_function(node) else {
            return Err(self.shape_error("function", function));
        };
        if node.has_modifier(ModifierFlags::ASYNC) || data.asterisk_token {
            return self.signature_return(function, ctx);
        }
        let body = data.body;
        if body.is_none() {
            return self.signature_return(function, ctx);
        }
        if !arena.is_kind(body, SyntaxKind::Block) {
            return Ok(self
                .evaluate_node(body, &ctx.unwrap_into("body"))?
                .unwrap_or_else(|| SchemaNode::primitive(IntrinsicKind::Undefined)));
        }

        let returns = self.return_statements(body);
        if returns.is_empty() {
            return Ok(SchemaNode::primitive(IntrinsicKind::Void));
        }
        let mut values = Vec::with_capacity(returns.len());
        for statement in returns {
            values.push(
                self.evaluate_node(statement, ctx)?
                    .unwrap_or_else(|| SchemaNode::primitive(IntrinsicKind::Undefined)),
            );
        }
        Ok(algebra::union(values))
    }

    /// `return` statements of a body in source order, not counting those of
    /// nested functions and classes.
    fn return_statements(&self, body: NodeIndex) -> Vec<NodeIndex> {
        let arena = self.arena();
        let mut out = Vec::new();
        let mut stack = vec![body];
        while let Some(current) = stack.pop() {
            let Some(node) = arena.get(current) else {
                continue;
            };
            if node.kind == SyntaxKind::ReturnStatement {
                out.push(current);
                continue;
            }
            if current != body && (node.kind.is_function_like() || node.kind.is_class_like()) {
                continue;
            }
            stack.extend(node.data.children().into_iter().rev());
        }
        out
    }

    // =========================================================================
    // Calls
    // =========================================================================

    pub(crate) fn call(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(call) = arena.get(node).and_then(|n| arena.get_call_expr(n)) else {
            return Err(self.shape_error("call expression", node));
        };
        if ctx.options().inline_call_bodies
            && let Some((symbol, function)) = self.inline_target(call.expression)?
            && let Some(value) = self.inline_call(symbol, function, call.arguments.as_ref(), ctx)?
        {
            return Ok(Some(value));
        }
        if let Some(signature) = self.host.resolved_signature_of(node) {
            return self
                .evaluate_type(self.host.return_type_of(signature), ctx)
                .map(Some);
        }
        self.node_type(node, ctx)
    }

    /// The callee's symbol and the function node whose body can be
    /// evaluated in place: a local function-like with a body and no return
    /// annotation, possibly held by a variable or property.
    pub(crate) fn inline_target(
        &self,
        callee: NodeIndex,
    ) -> Result<Option<(SymbolId, NodeIndex)>, ShapeError> {
        let arena = self.arena();
        let callee = arena.skip_outer_expressions(callee);
        let direct = self.direct_symbol(callee).or_else(|| {
            arena
                .get(callee)
                .and_then(|n| arena.get_access_expr(n))
                .filter(|_| arena.is_kind(callee, SyntaxKind::PropertyAccessExpression))
                .and_then(|access| self.direct_symbol(access.name_or_argument))
        });
        let (symbol, declaration) = match direct {
            Some(symbol) => {
                let declaration = self
                    .host
                    .symbol_info(symbol)
                    .map(|info| info.primary_declaration())
                    .unwrap_or_default();
                (symbol, declaration)
            }
            None => match self.resolver.resolve_definition(callee)? {
                Some(definition) => match definition.symbol {
                    Some(symbol) => (symbol, definition.declaration),
                    None => return Ok(None),
                },
                None => return Ok(None),
            },
        };
        Ok(self.inlinable_function(declaration).map(|function| (symbol, function)))
    }

    pub(crate) fn inlinable_function(&self, declaration: NodeIndex) -> Option<NodeIndex> {
        let arena = self.arena();
        let kind = arena.kind(declaration)?;
        let function = match kind {
            SyntaxKind::FunctionDeclaration
            | SyntaxKind::FunctionExpression
            | SyntaxKind::ArrowFunction
            | SyntaxKind::MethodDeclaration => declaration,
            SyntaxKind::VariableDeclaration
            | SyntaxKind::PropertyAssignment
            | SyntaxKind::PropertyDeclaration => {
                if arena.type_annotation_of(declaration).is_some() {
                    return None;
                }
                let initializer = arena.skip_outer_expressions(arena.initializer_of(declaration));
                let initializer_kind = arena.kind(initializer)?;
                if !matches!(
                    initializer_kind,
                    SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction
                ) {
                    return None;
                }
                initializer
            }
            _ => return None,
        };
        let data = arena.get(function).and_then(|n| arena.get_function(n))?;
        (data.body.is_some() && data.type_annotation.is_none()).then_some(function)
    }

    fn inline_call(
        &self,
        symbol: SymbolId,
        function: NodeIndex,
        arguments: Option<&NodeList>,
        ctx: &SchemaContext,
    ) -> Result<Option<SchemaNode>, ShapeError> {
        let depth = ctx.inline_depth();
        if depth >= MAX_INLINE_CALL_DEPTH {
            trace!(parent: ctx.span(), %symbol, "inline call depth reached");
            return Ok(None);
        }
        if !ctx.enter_symbol(symbol) {
            trace!(parent: ctx.span(), %symbol, "recursive call left to its signature");
            return Ok(None);
        }
        ctx.set_inline_depth(depth + 1);
        let result = self
            .call_arguments(arguments, ctx)
            .and_then(|values| self.evaluate_call_body(function, values, ctx));
        ctx.set_inline_depth(depth);
        ctx.leave_symbol(symbol);
        result.map(Some)
    }

    /// Argument schemas of a call, evaluated in the caller's scope. Spread
    /// tuples contribute their elements.
    pub(crate) fn call_arguments(
        &self,
        arguments: Option<&NodeList>,
        ctx: &SchemaContext,
    ) -> Result<Vec<SchemaNode>, ShapeError> {
        let Some(arguments) = arguments else {
            return Ok(Vec::new());
        };
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments.iter() {
            let value = self.descend_or_undefined(argument, ctx, "argument")?;
            let is_spread = self.arena().is_kind(argument, SyntaxKind::SpreadElement);
            match value.kind {
                SchemaKind::Tuple { items, .. } if is_spread => values.extend(items),
                _ => values.push(value),
            }
        }
        Ok(values)
    }

    /// Return value of `function` called with `arguments`.
    pub fn evaluate_call_body(
        &self,
        function: NodeIndex,
        arguments: Vec<SchemaNode>,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        if ctx.is_exhausted() {
            return Ok(SchemaNode::recursion_limit());
        }
        let label = self
            .arena()
            .name_text(self.arena().name_of(function))
            .unwrap_or("call");
        let callee = ctx.descend(label);
        let bindings = self.bind_parameters(function, arguments, &callee)?;
        self.body_return(function, &callee.with_bindings(bindings))
    }
}
