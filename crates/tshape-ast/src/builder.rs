//! Shorthand constructors for common node shapes.
//!
//! Hosts that build trees programmatically (tests, code generators, bridges
//! from another parser) use these instead of spelling out every payload. Each
//! one is a thin wrapper over `add_node`, so parent links and spans behave the
//! same way.

use crate::flags::NodeFlags;
use crate::node::*;
use crate::node_arena::NodeArena;
use crate::syntax_kind::{SyntaxKind, TokenKind};

const NONE: NodeIndex = NodeIndex::NONE;

fn list(nodes: &[NodeIndex]) -> NodeList {
    NodeList::new(nodes.to_vec())
}

fn optional_list(nodes: &[NodeIndex]) -> Option<NodeList> {
    (!nodes.is_empty()).then(|| list(nodes))
}

impl NodeArena {
    // =========================================================================
    // Declarations and statements
    // =========================================================================

    pub fn var_declaration(
        &mut self,
        name: NodeIndex,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            SyntaxKind::VariableDeclaration,
            NodeData::VariableDeclaration(VariableDeclarationData {
                name,
                exclamation_token: false,
                type_annotation,
                initializer,
            }),
        )
    }

    /// `const`/`let` statement holding the given declarations. Returns the
    /// statement.
    pub fn var_statement(&mut self, flags: NodeFlags, declarations: &[NodeIndex]) -> NodeIndex {
        let declaration_list = self.add_node(
            SyntaxKind::VariableDeclarationList,
            NodeData::Variable(VariableData {
                declarations: list(declarations),
            }),
        );
        self.add_flags(declaration_list, flags);
        self.add_node(
            SyntaxKind::VariableStatement,
            NodeData::VariableStatement(VariableStatementData { declaration_list }),
        )
    }

    /// `const name = initializer;` Returns the declaration.
    pub fn const_declaration(&mut self, name: &str, initializer: NodeIndex) -> NodeIndex {
        let name = self.add_identifier(name);
        let decl = self.var_declaration(name, NONE, initializer);
        self.var_statement(NodeFlags::CONST, &[decl]);
        decl
    }

    pub fn parameter(&mut self, name: NodeIndex, type_annotation: NodeIndex) -> NodeIndex {
        self.add_node(
            SyntaxKind::Parameter,
            NodeData::Parameter(ParameterData {
                dot_dot_dot_token: false,
                name,
                question_token: false,
                type_annotation,
                initializer: NONE,
            }),
        )
    }

    /// Function-like node of any kind with the given parts.
    pub fn function_like(
        &mut self,
        kind: SyntaxKind,
        name: NodeIndex,
        parameters: &[NodeIndex],
        type_annotation: NodeIndex,
        body: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::Function(FunctionData {
                name,
                type_parameters: None,
                parameters: list(parameters),
                type_annotation,
                body,
                asterisk_token: false,
            }),
        )
    }

    pub fn block(&mut self, statements: &[NodeIndex]) -> NodeIndex {
        self.add_node(
            SyntaxKind::Block,
            NodeData::Block(BlockData {
                statements: list(statements),
            }),
        )
    }

    /// Any single-expression wrapper: `return`, `throw`, parentheses, spread,
    /// `await`, expression statements.
    pub fn wrap_expression(&mut self, kind: SyntaxKind, expression: NodeIndex) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::UnaryExprEx(UnaryExprDataEx {
                expression,
                asterisk_token: false,
            }),
        )
    }

    pub fn return_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.wrap_expression(SyntaxKind::ReturnStatement, expression)
    }

    pub fn source_file(&mut self, statements: &[NodeIndex]) -> NodeIndex {
        let file_name = self.file_name().to_string();
        self.add_node(
            SyntaxKind::SourceFile,
            NodeData::SourceFile(SourceFileData {
                file_name,
                statements: list(statements),
            }),
        )
    }

    // =========================================================================
    // Classes, interfaces and members
    // =========================================================================

    pub fn class_declaration(
        &mut self,
        name: NodeIndex,
        heritage_clauses: &[NodeIndex],
        members: &[NodeIndex],
    ) -> NodeIndex {
        self.add_node(
            SyntaxKind::ClassDeclaration,
            NodeData::Class(ClassData {
                name,
                type_parameters: None,
                heritage_clauses: optional_list(heritage_clauses),
                members: list(members),
            }),
        )
    }

    pub fn interface_declaration(
        &mut self,
        name: NodeIndex,
        heritage_clauses: &[NodeIndex],
        members: &[NodeIndex],
    ) -> NodeIndex {
        self.add_node(
            SyntaxKind::InterfaceDeclaration,
            NodeData::Interface(InterfaceData {
                name,
                type_parameters: None,
                heritage_clauses: optional_list(heritage_clauses),
                members: list(members),
            }),
        )
    }

    pub fn type_alias(&mut self, name: NodeIndex, type_node: NodeIndex) -> NodeIndex {
        self.add_node(
            SyntaxKind::TypeAliasDeclaration,
            NodeData::TypeAlias(TypeAliasData {
                name,
                type_parameters: None,
                type_node,
            }),
        )
    }

    /// `extends`/`implements` clause over `ExpressionWithTypeArguments` nodes.
    pub fn heritage_clause(&mut self, token: TokenKind, types: &[NodeIndex]) -> NodeIndex {
        self.add_node(
            SyntaxKind::HeritageClause,
            NodeData::Heritage(HeritageData {
                token,
                types: list(types),
            }),
        )
    }

    /// Property signature or declaration, depending on `kind`.
    pub fn property_member(
        &mut self,
        kind: SyntaxKind,
        name: NodeIndex,
        type_annotation: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::Property(PropertyData {
                name,
                question_token: false,
                type_annotation,
                initializer: NONE,
            }),
        )
    }

    // =========================================================================
    // Type nodes
    // =========================================================================

    /// `TypeReference` or `ExpressionWithTypeArguments` naming `type_name`.
    pub fn type_reference(
        &mut self,
        kind: SyntaxKind,
        type_name: NodeIndex,
        type_arguments: &[NodeIndex],
    ) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::TypeRef(TypeRefData {
                type_name,
                type_arguments: optional_list(type_arguments),
            }),
        )
    }

    pub fn wrap_type(&mut self, kind: SyntaxKind, type_node: NodeIndex) -> NodeIndex {
        self.add_node(kind, NodeData::WrappedType(WrappedTypeData { type_node }))
    }

    /// Union, intersection or tuple type node.
    pub fn composite_type(&mut self, kind: SyntaxKind, types: &[NodeIndex]) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::CompositeType(CompositeTypeData { types: list(types) }),
        )
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn property_access(&mut self, expression: NodeIndex, name: &str) -> NodeIndex {
        let name = self.add_identifier(name);
        self.access(SyntaxKind::PropertyAccessExpression, expression, name)
    }

    pub fn element_access(&mut self, expression: NodeIndex, argument: NodeIndex) -> NodeIndex {
        self.access(SyntaxKind::ElementAccessExpression, expression, argument)
    }

    fn access(
        &mut self,
        kind: SyntaxKind,
        expression: NodeIndex,
        name_or_argument: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::Access(AccessExprData {
                expression,
                name_or_argument,
                question_dot_token: false,
            }),
        )
    }

    /// Call or `new` expression.
    pub fn call(
        &mut self,
        kind: SyntaxKind,
        expression: NodeIndex,
        arguments: &[NodeIndex],
    ) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::Call(CallExprData {
                expression,
                type_arguments: None,
                arguments: Some(list(arguments)),
            }),
        )
    }

    pub fn binary(
        &mut self,
        left: NodeIndex,
        operator_token: TokenKind,
        right: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            SyntaxKind::BinaryExpression,
            NodeData::Binary(BinaryExprData {
                left,
                operator_token,
                right,
            }),
        )
    }

    pub fn prefix_unary(&mut self, operator: TokenKind, operand: NodeIndex) -> NodeIndex {
        self.add_node(
            SyntaxKind::PrefixUnaryExpression,
            NodeData::UnaryExpr(UnaryExprData { operator, operand }),
        )
    }

    pub fn conditional(
        &mut self,
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            SyntaxKind::ConditionalExpression,
            NodeData::Conditional(ConditionalExprData {
                condition,
                when_true,
                when_false,
            }),
        )
    }

    /// `as`, `<T>` or `satisfies` expression.
    pub fn type_assertion(
        &mut self,
        kind: SyntaxKind,
        expression: NodeIndex,
        type_node: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::TypeAssertion(TypeAssertionData {
                expression,
                type_node,
            }),
        )
    }

    /// `expression as const`.
    pub fn as_const(&mut self, expression: NodeIndex) -> NodeIndex {
        let assertion = self.type_assertion(SyntaxKind::AsExpression, expression, NONE);
        self.add_flags(assertion, NodeFlags::CONST_ASSERTION);
        assertion
    }

    /// Array or object literal.
    pub fn literal_expression(&mut self, kind: SyntaxKind, elements: &[NodeIndex]) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::LiteralExpr(LiteralExprData {
                elements: list(elements),
            }),
        )
    }

    /// `name: initializer` in an object literal.
    pub fn property_assignment(&mut self, name: &str, initializer: NodeIndex) -> NodeIndex {
        let name = self.add_identifier(name);
        self.add_node(
            SyntaxKind::PropertyAssignment,
            NodeData::PropertyAssignment(PropertyAssignmentData { name, initializer }),
        )
    }

    pub fn shorthand_property(&mut self, name: &str) -> NodeIndex {
        let name = self.add_identifier(name);
        self.add_node(
            SyntaxKind::ShorthandPropertyAssignment,
            NodeData::PropertyAssignment(PropertyAssignmentData {
                name,
                initializer: NONE,
            }),
        )
    }

    /// Template expression from a head text and `(expression, literal text)`
    /// spans. The last span's literal is the tail.
    pub fn template_expression(&mut self, head: &str, spans: &[(NodeIndex, &str)]) -> NodeIndex {
        let head = self.add_literal(SyntaxKind::TemplateHead, head);
        let mut template_spans = Vec::with_capacity(spans.len());
        for (i, &(expression, text)) in spans.iter().enumerate() {
            let kind = if i + 1 == spans.len() {
                SyntaxKind::TemplateTail
            } else {
                SyntaxKind::TemplateMiddle
            };
            let literal = self.add_literal(kind, text);
            template_spans.push(self.add_node(
                SyntaxKind::TemplateSpan,
                NodeData::TemplateSpan(TemplateSpanData {
                    expression,
                    literal,
                }),
            ));
        }
        self.add_node(
            SyntaxKind::TemplateExpression,
            NodeData::Template(TemplateExprData {
                head,
                template_spans: list(&template_spans),
            }),
        )
    }

    // =========================================================================
    // Destructuring
    // =========================================================================

    pub fn binding_element(&mut self, property_name: NodeIndex, name: NodeIndex) -> NodeIndex {
        self.add_node(
            SyntaxKind::BindingElement,
            NodeData::BindingElement(BindingElementData {
                dot_dot_dot_token: false,
                property_name,
                name,
                initializer: NONE,
            }),
        )
    }

    /// Object or array binding pattern.
    pub fn binding_pattern(&mut self, kind: SyntaxKind, elements: &[NodeIndex]) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::BindingPattern(BindingPatternData {
                elements: list(elements),
            }),
        )
    }

    // =========================================================================
    // Modules
    // =========================================================================

    /// `import <clause> from "<module>"` or `export <clause> from "<module>"`.
    /// Returns the declaration.
    pub fn module_declaration(
        &mut self,
        kind: SyntaxKind,
        import_clause: NodeIndex,
        module: &str,
    ) -> NodeIndex {
        let module_specifier = if module.is_empty() {
            NONE
        } else {
            self.add_string_literal(module)
        };
        self.add_node(
            kind,
            NodeData::ImportDecl(ImportDeclData {
                import_clause,
                module_specifier,
            }),
        )
    }

    pub fn import_clause(&mut self, name: NodeIndex, named_bindings: NodeIndex) -> NodeIndex {
        self.add_node(
            SyntaxKind::ImportClause,
            NodeData::ImportClause(ImportClauseData {
                name,
                named_bindings,
            }),
        )
    }

    /// Import, export or namespace specifier.
    pub fn specifier(
        &mut self,
        kind: SyntaxKind,
        property_name: NodeIndex,
        name: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::Specifier(SpecifierData {
                property_name,
                name,
            }),
        )
    }

    /// `NamedImports` or `NamedExports`.
    pub fn named_bindings(&mut self, kind: SyntaxKind, elements: &[NodeIndex]) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::NamedImports(NamedImportsData {
                elements: list(elements),
            }),
        )
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod tests;
