//! Identifiers, member access, operators and declaration values.

use super::{SchemaEvaluator, SchemaResult};
use crate::algebra;
use crate::context::SchemaContext;
use crate::schema::{SchemaKind, SchemaNode, TemplatePart};
use tracing::trace;
use tshape_ast::{NodeIndex, SyntaxKind, TokenKind};
use tshape_host::{IntrinsicKind, SymbolId};
use tshape_resolver::classify::{is_const_assertion, is_declaration_name, unwrap_symbol_target};
use tshape_resolver::{RecursionResult, ShapeError};

impl SchemaEvaluator<'_> {
    // =========================================================================
    // Identifiers
    // =========================================================================

    pub(crate) fn identifier(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        if is_declaration_name(arena, node) {
            let parent = arena.parent_of(node);
            // A shorthand property's name is also a read of the variable.
            if !arena.is_kind(parent, SyntaxKind::ShorthandPropertyAssignment) {
                return self.evaluate_node(parent, &ctx.unwrap_into("declaration"));
            }
        }
        self.reference_value(node, ctx)
    }

    /// Value read through an identifier: the binding of a parameter, the
    /// initializer of a constant, or the host type at the read.
    pub(crate) fn reference_value(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(symbol) = self.direct_symbol(node) else {
            return match arena.name_text(node) {
                Some("undefined") => Ok(Some(SchemaNode::primitive(IntrinsicKind::Undefined))),
                Some("NaN") => Ok(Some(SchemaNode::number(f64::NAN))),
                Some("Infinity") => Ok(Some(SchemaNode::number(f64::INFINITY))),
                _ => self.node_type(node, ctx),
            };
        };
        let declaration = self
            .host
            .symbol_info(symbol)
            .map(|info| info.primary_declaration())
            .unwrap_or_default();
        match arena.kind(declaration) {
            Some(SyntaxKind::Parameter) => self.parameter_value(declaration, ctx).map(Some),
            Some(SyntaxKind::VariableDeclaration) if self.is_propagated_constant(declaration) => {
                let initializer = arena.initializer_of(declaration);
                self.guarded_declaration(declaration, node, ctx, |ctx| {
                    self.evaluate_node(initializer, ctx)
                })
            }
            Some(SyntaxKind::BindingElement) => {
                self.guarded_declaration(declaration, node, ctx, |ctx| {
                    self.binding_element(declaration, ctx).map(Some)
                })
            }
            Some(SyntaxKind::EnumMember) => {
                self.guarded_declaration(declaration, node, ctx, |ctx| {
                    self.enum_member(declaration, ctx)
                })
            }
            Some(SyntaxKind::FunctionDeclaration) => self.function_value(declaration, ctx).map(Some),
            _ => self.node_type(node, ctx),
        }
    }

    /// A `const` without a type annotation whose initializer is inlined.
    fn is_propagated_constant(&self, declaration: NodeIndex) -> bool {
        let arena = self.arena();
        arena.is_const_declaration(declaration)
            && arena.type_annotation_of(declaration).is_none()
            && arena.initializer_of(declaration).is_some()
    }

    /// Evaluate through `declaration` unless it is already being evaluated
    /// further up the stack, in which case the host type at `read` is used.
    pub(crate) fn guarded_declaration(
        &self,
        declaration: NodeIndex,
        read: NodeIndex,
        ctx: &SchemaContext,
        evaluate: impl FnOnce(&SchemaContext) -> SchemaResult,
    ) -> SchemaResult {
        match ctx.enter_declaration(declaration) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(parent: ctx.span(), declaration = declaration.0, "declaration refers to itself");
                return self.node_type(read, ctx);
            }
            RecursionResult::DepthExceeded => return Ok(Some(SchemaNode::recursion_limit())),
        }
        let label = self.arena().name_text(self.arena().name_of(declaration)).unwrap_or("declaration");
        let result = evaluate(&ctx.unwrap_into(label));
        ctx.leave_declaration(declaration);
        result
    }

    /// Symbol bound at `node`, unwrapped to its declaring symbol.
    pub(crate) fn direct_symbol(&self, node: NodeIndex) -> Option<SymbolId> {
        self.host
            .symbol_at(node)
            .map(|symbol| unwrap_symbol_target(self.host, symbol))
    }

    pub(crate) fn qualified_name(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let Some(definition) = self.resolver.resolve_definition(node)? else {
            return self.node_type(node, ctx);
        };
        self.evaluate_type(definition.type_id(self.host), ctx).map(Some)
    }

    /// Import and export specifiers evaluate to whatever they finally name.
    pub(crate) fn imported_value(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let Some(definition) = self.resolver.resolve_definition(node)? else {
            return Ok(None);
        };
        let declaration = definition.declaration;
        let arena = self.arena();
        if declaration.is_some()
            && declaration != node
            && arena.is_kind(declaration, SyntaxKind::VariableDeclaration)
            && self.is_propagated_constant(declaration)
        {
            let initializer = arena.initializer_of(declaration);
            return self.guarded_declaration(declaration, node, ctx, |ctx| {
                self.evaluate_node(initializer, ctx)
            });
        }
        self.evaluate_type(definition.type_id(self.host), ctx).map(Some)
    }

    // =========================================================================
    // Keywords and wrappers
    // =========================================================================

    pub(crate) fn type_keyword(&self, kind: SyntaxKind) -> SchemaResult {
        let primitive = match kind {
            SyntaxKind::AnyKeyword => IntrinsicKind::Any,
            SyntaxKind::UnknownKeyword => IntrinsicKind::Unknown,
            SyntaxKind::NeverKeyword => IntrinsicKind::Never,
            SyntaxKind::VoidKeyword => IntrinsicKind::Void,
            SyntaxKind::UndefinedKeyword => IntrinsicKind::Undefined,
            SyntaxKind::BooleanKeyword => IntrinsicKind::Boolean,
            SyntaxKind::NumberKeyword => IntrinsicKind::Number,
            SyntaxKind::StringKeyword => IntrinsicKind::String,
            SyntaxKind::BigIntKeyword => IntrinsicKind::BigInt,
            SyntaxKind::SymbolKeyword => IntrinsicKind::Symbol,
            SyntaxKind::ObjectKeyword => IntrinsicKind::Object,
            _ => return Err(ShapeError::unexpected("type keyword", kind)),
        };
        Ok(Some(SchemaNode::primitive(primitive)))
    }

    /// Single-expression wrappers evaluate to their operand. Depth is not
    /// spent.
    pub(crate) fn wrapped_expression(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(n) = arena.get(node) else {
            return Ok(None);
        };
        let inner = if n.kind == SyntaxKind::TemplateSpan {
            arena.get_template_span(n).map(|span| span.expression)
        } else {
            arena.get_unary_expr_ex(n).map(|e| e.expression)
        };
        let Some(inner) = inner else {
            return Err(self.shape_error("wrapped expression", node));
        };
        self.evaluate_node(inner, &ctx.unwrap_into(n.kind.name()))
    }

    pub(crate) fn wrapped_type(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let ty = self.host.type_at(node);
        if ty != tshape_host::TypeId::ERROR {
            return self.evaluate_type(ty, ctx).map(Some);
        }
        let arena = self.arena();
        let inner = arena
            .get(node)
            .and_then(|n| arena.get_wrapped_type(n))
            .map(|wrapped| wrapped.type_node)
            .unwrap_or_default();
        if inner.is_none() {
            return self.evaluate_type(ty, ctx).map(Some);
        }
        self.evaluate_node(inner, &ctx.unwrap_into("type"))
    }

    pub(crate) fn non_null(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        Ok(self
            .wrapped_expression(node, ctx)?
            .map(algebra::without_nullish))
    }

    pub(crate) fn type_assertion(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(assertion) = arena.get(node).and_then(|n| arena.get_type_assertion(n)) else {
            return Err(self.shape_error("type assertion", node));
        };
        if is_const_assertion(arena, node) {
            return Ok(self
                .evaluate_node(assertion.expression, &ctx.unwrap_into("as const"))?
                .map(algebra::make_readonly));
        }
        if assertion.type_node.is_some() {
            return self.annotation_type(assertion.type_node, ctx).map(Some);
        }
        self.node_type(node, ctx)
    }

    pub(crate) fn satisfies(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(assertion) = arena.get(node).and_then(|n| arena.get_type_assertion(n)) else {
            return Err(self.shape_error("satisfies expression", node));
        };
        self.evaluate_node(assertion.expression, &ctx.unwrap_into("satisfies"))
    }

    // =========================================================================
    // Member access
    // =========================================================================

    pub(crate) fn member_access(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(n) = arena.get(node) else {
            return Ok(None);
        };
        let Some(access) = arena.get_access_expr(n) else {
            return Err(self.shape_error("member access", node));
        };
        let Some(object) = self.descend_into(access.expression, ctx, "object")? else {
            return self.node_type(node, ctx);
        };
        let key = if n.kind == SyntaxKind::PropertyAccessExpression {
            match arena.name_text(access.name_or_argument) {
                Some(name) => SchemaNode::string(name),
                None => return self.node_type(node, ctx),
            }
        } else {
            match self.descend_into(access.name_or_argument, ctx, "index")? {
                Some(key) => key,
                None => return self.node_type(node, ctx),
            }
        };

        let open = !object.is_concrete() || !key.is_concrete();
        let mut value = algebra::index_access(object, key);
        if !open && matches!(value.kind, SchemaKind::IndexAccess { .. }) {
            // The object is known but has no such member in schema form
            // (methods of primitives, members of named types).
            return self.node_type(node, ctx);
        }
        if access.question_dot_token && !open {
            value = algebra::union([value, SchemaNode::primitive(IntrinsicKind::Undefined)]);
        }
        Ok(Some(value))
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub(crate) fn type_of(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let operand = arena
            .get(node)
            .and_then(|n| arena.get_unary_expr_ex(n))
            .map(|e| e.expression)
            .unwrap_or_default();
        match self.descend_into(operand, ctx, "typeof")? {
            Some(operand) => Ok(Some(algebra::type_of(&operand))),
            None => Ok(Some(SchemaNode::primitive(IntrinsicKind::String))),
        }
    }

    pub(crate) fn prefix_unary(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(unary) = arena.get(node).and_then(|n| arena.get_unary_expr(n)) else {
            return Err(self.shape_error("prefix unary expression", node));
        };
        match self.descend_into(unary.operand, ctx, "operand")? {
            Some(operand) => Ok(Some(algebra::fold_unary(unary.operator, operand))),
            None => self.node_type(node, ctx),
        }
    }

    pub(crate) fn postfix_unary(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(unary) = arena.get(node).and_then(|n| arena.get_unary_expr(n)) else {
            return Err(self.shape_error("postfix unary expression", node));
        };
        match self.descend_into(unary.operand, ctx, "operand")? {
            Some(operand) => Ok(Some(algebra::fold_postfix(operand))),
            None => self.node_type(node, ctx),
        }
    }

    pub(crate) fn binary(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(binary) = arena.get(node).and_then(|n| arena.get_binary_expr(n)) else {
            return Err(self.shape_error("binary expression", node));
        };
        let operator = binary.operator_token;
        if operator == TokenKind::Equals {
            return self.descend_into(binary.right, ctx, "right");
        }
        let left = self.descend_into(binary.left, ctx, "left")?;
        let right = self.descend_into(binary.right, ctx, "right")?;
        match (left, right) {
            (Some(left), Some(right)) => Ok(Some(algebra::fold_binary(operator, left, right))),
            _ => self.node_type(node, ctx),
        }
    }

    pub(crate) fn conditional(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(data) = arena.get(node).and_then(|n| arena.get_conditional_expr(n)) else {
            return Err(self.shape_error("conditional expression", node));
        };
        let condition = self.descend_into(data.condition, ctx, "condition")?;
        if let Some(condition) = &condition
            && let Some(truthy) = condition.truthiness()
        {
            let (taken, label) = if truthy {
                (data.when_true, "when true")
            } else {
                (data.when_false, "when false")
            };
            return Ok(Some(self.descend_or_undefined(taken, ctx, label)?));
        }
        let when_true = self.descend_or_undefined(data.when_true, ctx, "when true")?;
        let when_false = self.descend_or_undefined(data.when_false, ctx, "when false")?;
        Ok(Some(match condition {
            Some(condition) => algebra::conditional(&condition, when_true, when_false),
            None => algebra::union([when_true, when_false]),
        }))
    }

    pub(crate) fn template_expression(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(template) = arena.get(node).and_then(|n| arena.get_template_expr(n)) else {
            return Err(self.shape_error("template expression", node));
        };
        let mut parts = Vec::with_capacity(template.template_spans.len() * 2 + 1);
        parts.push(TemplatePart::Text(self.fragment_text(template.head)));
        for span_node in template.template_spans.iter() {
            let Some(span) = arena.get(span_node).and_then(|n| arena.get_template_span(n)) else {
                return Err(self.shape_error("template span", span_node));
            };
            let value = self
                .descend_into(span.expression, ctx, "template span")?
                .unwrap_or_else(|| SchemaNode::primitive(IntrinsicKind::String));
            parts.push(TemplatePart::Schema(value));
            parts.push(TemplatePart::Text(self.fragment_text(span.literal)));
        }
        Ok(Some(algebra::fold_template(
            parts,
            ctx.options().template_expansion_limit,
        )))
    }

    fn fragment_text(&self, fragment: NodeIndex) -> String {
        let arena = self.arena();
        arena
            .get(fragment)
            .and_then(|n| arena.get_literal(n))
            .map(|literal| literal.text.clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Statements and declarations
    // =========================================================================

    pub(crate) fn return_statement(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let expression = arena
            .get(node)
            .and_then(|n| arena.get_unary_expr_ex(n))
            .map(|e| e.expression)
            .unwrap_or_default();
        if expression.is_none() {
            return Ok(Some(SchemaNode::primitive(IntrinsicKind::Undefined)));
        }
        self.evaluate_node(expression, &ctx.unwrap_into("return"))
    }

    pub(crate) fn variable_statement(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let list = arena
            .get(node)
            .and_then(|n| arena.get_variable_statement(n))
            .map(|statement| statement.declaration_list)
            .unwrap_or_default();
        self.evaluate_node(list, ctx)
    }

    /// The value of a declaration list with exactly one declaration.
    pub(crate) fn variable_declaration_list(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(list) = arena.get(node).and_then(|n| arena.get_variable(n)) else {
            return Ok(None);
        };
        if list.declarations.len() != 1 {
            return Ok(None);
        }
        match list.declarations.get(0) {
            Some(declaration) => self.evaluate_node(declaration, ctx),
            None => Ok(None),
        }
    }

    pub(crate) fn variable_declaration(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let arena = self.arena();
        let Some(declaration) = arena.get(node).and_then(|n| arena.get_variable_declaration(n)) else {
            return Err(self.shape_error("variable declaration", node));
        };
        if declaration.type_annotation.is_some() {
            return self.annotation_type(declaration.type_annotation, ctx);
        }
        if self.is_propagated_constant(node) {
            let initializer = declaration.initializer;
            if let Some(value) = self.guarded_declaration(node, node, ctx, |ctx| {
                self.evaluate_node(initializer, ctx)
            })? {
                return Ok(value);
            }
        }
        self.evaluate_type(self.host.type_at(node), ctx)
    }

    pub(crate) fn property_member(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let Some(property) = arena.get(node).and_then(|n| arena.get_property_decl(n)) else {
            return Err(self.shape_error("property declaration", node));
        };
        if property.type_annotation.is_some() {
            return self.annotation_type(property.type_annotation, ctx).map(Some);
        }
        if property.initializer.is_some() {
            return self.evaluate_node(property.initializer, &ctx.unwrap_into("initializer"));
        }
        self.node_type(node, ctx)
    }

    pub(crate) fn enum_member(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let initializer = arena.initializer_of(node);
        if initializer.is_some()
            && let Some(value) = self.evaluate_node(initializer, &ctx.unwrap_into("enum member"))?
            && value.as_literal().is_some()
        {
            return Ok(Some(value));
        }
        self.node_type(node, ctx)
    }

    pub(crate) fn jsdoc_tag(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let expression = self.arena().type_annotation_of(node);
        if expression.is_none() {
            return Ok(None);
        }
        self.annotation_type(expression, ctx).map(Some)
    }
}
