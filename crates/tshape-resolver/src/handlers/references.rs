//! Identifiers, `this`, `super` and type references.

use crate::classify::{
    enclosing_class, is_argument_position, is_assignment_target, is_const_assertion,
    is_declaration_name, is_default_import_name,
};
use crate::definition::Resolution;
use crate::resolver::{DeclarationResolver, ResolveResult};
use tshape_ast::{NodeData, NodeIndex, SyntaxKind, TokenKind};

impl DeclarationResolver<'_> {
    /// Identifier resolution order:
    /// 1. in an argument position, the contextual type's symbol, followed;
    /// 2. the name of a property assignment refers to nothing;
    /// 3. a default import goes through the module's `default` export;
    /// 4. a declaration name or assignment target takes its parent's
    ///    resolution when that carries a declaration;
    /// 5. otherwise the direct lookup, followed.
    pub(crate) fn identifier(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let parent = arena.parent_of(node);
        let parent_node = arena.get(parent);

        if is_argument_position(arena, node) {
            if let Some(Resolution::Resolved(def)) = self.contextual(node)? {
                return Ok(Some(Resolution::Resolved(self.follow(def)?)));
            }
        }

        if let Some(parent_node) = parent_node {
            match &parent_node.data {
                NodeData::PropertyAssignment(assignment)
                    if parent_node.kind == SyntaxKind::PropertyAssignment
                        && assignment.name == node =>
                {
                    return Ok(None);
                }
                NodeData::Access(access)
                    if parent_node.kind == SyntaxKind::PropertyAccessExpression
                        && access.name_or_argument == node =>
                {
                    return self.resolve_inner(parent);
                }
                NodeData::QualifiedName(name) if name.right == node => {
                    return self.resolve_inner(parent);
                }
                _ => {}
            }
        }

        if is_default_import_name(arena, node) {
            return self.default_import(parent);
        }

        if is_declaration_name(arena, node) || is_assignment_target(arena, node) {
            if let Some(def) = self.resolve_declared(parent)? {
                return Ok(Some(Resolution::Resolved(def)));
            }
        }

        self.direct_followed(node)
    }

    /// Direct lookup, then alias following.
    pub(crate) fn direct_followed(&self, node: NodeIndex) -> ResolveResult {
        match self.direct(node)? {
            Some(Resolution::Resolved(def)) => Ok(Some(Resolution::Resolved(self.follow(def)?))),
            other => Ok(other),
        }
    }

    /// `this` names the innermost enclosing class, or the declared `this`
    /// parameter type of the innermost non-arrow function.
    pub(crate) fn this_keyword(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        for ancestor in arena.ancestors(node) {
            let Some(ancestor_node) = arena.get(ancestor) else {
                break;
            };
            match ancestor_node.kind {
                kind if kind.is_class_like() => return self.own_symbol(ancestor),
                SyntaxKind::InterfaceDeclaration | SyntaxKind::TypeLiteral => {
                    return self.own_symbol(ancestor);
                }
                SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionExpression => {
                    let Some(function) = arena.get_function(ancestor_node) else {
                        return Err(self.shape_error("function", ancestor));
                    };
                    let this_annotation = function.parameters.get(0).and_then(|param| {
                        let name = arena.name_of(param);
                        (arena.name_text(name) == Some("this"))
                            .then(|| arena.type_annotation_of(param))
                            .filter(|annotation| annotation.is_some())
                    });
                    return match this_annotation {
                        Some(annotation) => self.resolve_inner(annotation),
                        None => self.direct(node),
                    };
                }
                _ => {}
            }
        }
        self.direct(node)
    }

    /// `super` resolves to the base class named by the `extends` clause.
    pub(crate) fn super_keyword(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let base = enclosing_class(arena, node).and_then(|class| {
            let clauses = arena.heritage_clauses_of(class)?;
            clauses.iter().find_map(|clause| {
                let heritage = arena.get_heritage(arena.get(clause)?)?;
                (heritage.token == TokenKind::ExtendsKeyword)
                    .then(|| heritage.types.get(0))
                    .flatten()
            })
        });
        match base {
            Some(base) => self.resolve_inner(base),
            None => self.direct(node),
        }
    }

    pub(crate) fn qualified_name(&self, node: NodeIndex) -> ResolveResult {
        match self.direct(node)? {
            Some(Resolution::Resolved(def)) => Ok(Some(Resolution::Resolved(self.follow(def)?))),
            other => Ok(other),
        }
    }

    /// Type references use the referenced type's identity, falling back to the
    /// type name.
    pub(crate) fn type_reference(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(type_ref) = arena.get(node).and_then(|n| arena.get_type_ref(n)) else {
            return Err(self.shape_error("type reference", node));
        };
        if let Some(Resolution::Resolved(def)) = self.direct(node)? {
            if def.symbol.is_some() {
                return Ok(Some(Resolution::Resolved(self.follow(def)?)));
            }
        }
        self.resolve_inner(type_ref.type_name)
    }

    /// `typeof x` in a type position resolves `x` as a value.
    pub(crate) fn type_query(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(type_ref) = arena.get(node).and_then(|n| arena.get_type_ref(n)) else {
            return Err(self.shape_error("type query", node));
        };
        match self.resolve_inner(type_ref.type_name)? {
            Some(found) => Ok(Some(found)),
            None => self.direct(node),
        }
    }

    pub(crate) fn wrapped_type(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(wrapped) = arena.get(node).and_then(|n| arena.get_wrapped_type(n)) else {
            return Err(self.shape_error("wrapped type", node));
        };
        match self.resolve_inner(wrapped.type_node)? {
            Some(found) => Ok(Some(found)),
            None => self.direct(node),
        }
    }

    /// Single-expression wrappers resolve as their expression.
    pub(crate) fn wrapped_expression(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(wrapper) = arena.get(node) else {
            return Ok(None);
        };
        let expression = match &wrapper.data {
            NodeData::UnaryExprEx(data) => data.expression,
            NodeData::TemplateSpan(data) => data.expression,
            _ => return Err(self.shape_error("expression wrapper", node)),
        };
        if expression.is_none() {
            return self.nothing();
        }
        self.resolve_inner(expression)
    }

    /// The asserted type wins over the expression, except for `as const`.
    pub(crate) fn type_assertion(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(assertion) = arena.get(node).and_then(|n| arena.get_type_assertion(n)) else {
            return Err(self.shape_error("type assertion", node));
        };
        if is_const_assertion(arena, node) {
            return self.resolve_inner(assertion.expression);
        }
        match self.resolve_declared(assertion.type_node)? {
            Some(def) => Ok(Some(Resolution::Resolved(def))),
            None => self.direct(node),
        }
    }

    pub(crate) fn satisfies(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(assertion) = arena.get(node).and_then(|n| arena.get_type_assertion(n)) else {
            return Err(self.shape_error("satisfies expression", node));
        };
        self.resolve_inner(assertion.expression)
    }
}
