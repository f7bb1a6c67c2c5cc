//! Statements and value declarations.

use crate::definition::Resolution;
use crate::resolver::{DeclarationResolver, ResolveResult};
use tshape_ast::NodeIndex;

impl DeclarationResolver<'_> {
    pub(crate) fn variable_statement(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(statement) = arena.get(node).and_then(|n| arena.get_variable_statement(n)) else {
            return Err(self.shape_error("variable statement", node));
        };
        if statement.declaration_list.is_none() {
            return self.nothing();
        }
        self.resolve_inner(statement.declaration_list)
    }

    /// A declaration list resolves as its first declaration.
    pub(crate) fn variable_declaration_list(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(list) = arena.get(node).and_then(|n| arena.get_variable(n)) else {
            return Err(self.shape_error("variable declaration list", node));
        };
        match list.declarations.get(0) {
            Some(first) => self.resolve_inner(first),
            None => self.nothing(),
        }
    }

    /// The annotation wins; then an initializer that resolves to a symbol;
    /// then the variable itself.
    pub(crate) fn variable_declaration(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(decl) = arena.get(node).and_then(|n| arena.get_variable_declaration(n)) else {
            return Err(self.shape_error("variable declaration", node));
        };
        if decl.type_annotation.is_some() {
            if let Some(def) = self.resolve_declared(decl.type_annotation)? {
                return Ok(Some(Resolution::Resolved(def)));
            }
        } else if decl.initializer.is_some() {
            let from_initializer = self
                .resolve_declared(decl.initializer)?
                .filter(|def| def.symbol.is_some());
            if let Some(def) = from_initializer {
                return Ok(Some(Resolution::Resolved(def)));
            }
        }
        self.own_symbol(node)
    }

    /// Annotation, then the contextual type (a callback parameter), then the
    /// parameter itself.
    pub(crate) fn parameter(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(param) = arena.get(node).and_then(|n| arena.get_parameter(n)) else {
            return Err(self.shape_error("parameter", node));
        };
        if param.type_annotation.is_some() {
            if let Some(def) = self.resolve_declared(param.type_annotation)? {
                return Ok(Some(Resolution::Resolved(def)));
            }
        } else if let Some(found) = self.contextual(node)? {
            return Ok(Some(found));
        }
        self.own_symbol(node)
    }

    pub(crate) fn return_statement(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(statement) = arena.get(node).and_then(|n| arena.get_unary_expr_ex(n)) else {
            return Err(self.shape_error("return statement", node));
        };
        if statement.expression.is_none() {
            return self.nothing();
        }
        self.resolve_inner(statement.expression)
    }

    pub(crate) fn catch_clause(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(clause) = arena.get(node).and_then(|n| arena.get_catch_clause(n)) else {
            return Err(self.shape_error("catch clause", node));
        };
        if clause.variable_declaration.is_none() {
            return self.nothing();
        }
        self.resolve_inner(clause.variable_declaration)
    }

    /// Enum members resolve through the enum's type, falling back to the
    /// member name.
    pub(crate) fn enum_member(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let host = self.host();
        let name = arena.name_of(node);
        let enum_decl = arena.parent_of(node);
        let enum_type = match self.symbol_at(enum_decl) {
            Some(symbol) => host.type_of_symbol_at(symbol, enum_decl),
            None => host.type_at(enum_decl),
        };
        if !enum_type.is_any_like() {
            let member = arena
                .name_text(name)
                .and_then(|text| host.property_named(enum_type, text));
            if let Some(member) = member {
                return Ok(Some(Resolution::Resolved(self.symbol_definition(member, node))));
            }
        }
        if name.is_some() {
            return self.direct(name);
        }
        self.direct(node)
    }
}
