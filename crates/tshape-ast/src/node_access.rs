//! NodeArena access methods.
//!
//! Typed accessors return `None` when the node's payload is not the requested
//! shape, so callers can treat a kind/payload mismatch as a structural error.

use crate::node::*;
use crate::node_arena::NodeArena;
use crate::syntax_kind::SyntaxKind;

macro_rules! accessors {
    ($($(#[$doc:meta])* $fn_name:ident => $variant:ident($data:ty);)*) => {
        impl NodeArena {
            $(
                $(#[$doc])*
                #[inline]
                pub fn $fn_name<'a>(&self, node: &'a Node) -> Option<&'a $data> {
                    match &node.data {
                        NodeData::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            )*
        }
    };
}

accessors! {
    /// Identifier or private identifier.
    get_identifier => Identifier(IdentifierData);
    get_literal => Literal(LiteralData);
    get_qualified_name => QualifiedName(QualifiedNameData);
    /// Single-expression wrappers (parentheses, spread, await, return, ...).
    get_unary_expr_ex => UnaryExprEx(UnaryExprDataEx);
    get_wrapped_type => WrappedType(WrappedTypeData);
    get_type_ref => TypeRef(TypeRefData);
    get_type_operator => TypeOperator(TypeOperatorData);
    get_type_parameter => TypeParameter(TypeParameterData);
    get_parameter => Parameter(ParameterData);
    get_property_decl => Property(PropertyData);
    /// Any function-like kind.
    get_function => Function(FunctionData);
    get_block => Block(BlockData);
    get_source_file => SourceFile(SourceFileData);
    get_literal_expr => LiteralExpr(LiteralExprData);
    get_binding_pattern => BindingPattern(BindingPatternData);
    get_composite_type => CompositeType(CompositeTypeData);
    get_type_literal => TypeLiteral(TypeLiteralData);
    get_named_imports => NamedImports(NamedImportsData);
    /// Call or `new` expression.
    get_call_expr => Call(CallExprData);
    get_tagged_template => TaggedTemplate(TaggedTemplateData);
    /// Property or element access.
    get_access_expr => Access(AccessExprData);
    get_type_assertion => TypeAssertion(TypeAssertionData);
    get_unary_expr => UnaryExpr(UnaryExprData);
    get_binary_expr => Binary(BinaryExprData);
    get_conditional_expr => Conditional(ConditionalExprData);
    get_conditional_type => ConditionalType(ConditionalTypeData);
    get_template_expr => Template(TemplateExprData);
    get_template_span => TemplateSpan(TemplateSpanData);
    get_class => Class(ClassData);
    get_interface => Interface(InterfaceData);
    get_type_alias => TypeAlias(TypeAliasData);
    get_enum => Enum(EnumData);
    get_enum_member => EnumMember(EnumMemberData);
    get_module => Module(ModuleData);
    get_variable_statement => VariableStatement(VariableStatementData);
    get_variable => Variable(VariableData);
    get_variable_declaration => VariableDeclaration(VariableDeclarationData);
    get_binding_element => BindingElement(BindingElementData);
    get_property_assignment => PropertyAssignment(PropertyAssignmentData);
    get_heritage => Heritage(HeritageData);
    get_import_decl => ImportDecl(ImportDeclData);
    get_import_clause => ImportClause(ImportClauseData);
    get_specifier => Specifier(SpecifierData);
    get_import_equals => ImportEquals(ImportEqualsData);
    get_if_statement => If(IfStatementData);
    get_loop => Loop(LoopData);
    get_jump => Jump(JumpData);
    get_labeled => Labeled(LabeledData);
    get_switch => Switch(SwitchData);
    get_case_clause => CaseClause(CaseClauseData);
    get_try => Try(TryData);
    get_catch_clause => CatchClause(CatchClauseData);
    get_mapped_type => MappedType(MappedTypeData);
    get_indexed_access_type => IndexedAccessType(IndexedAccessTypeData);
    get_type_predicate => TypePredicate(TypePredicateData);
    get_named_tuple_member => NamedTupleMember(NamedTupleMemberData);
    get_meta_property => MetaProperty(MetaPropertyData);
    get_jsx_element => JsxElement(JsxElementData);
    get_jsx_opening => JsxOpening(JsxOpeningData);
    get_jsx_closing => JsxClosing(JsxClosingData);
    get_jsdoc => JSDoc(JSDocData);
    get_jsdoc_tag => JSDocTag(JSDocTagData);
}

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<SyntaxKind> {
        self.get(index).map(|node| node.kind)
    }

    #[inline]
    pub fn is_kind(&self, index: NodeIndex, kind: SyntaxKind) -> bool {
        self.kind(index) == Some(kind)
    }

    /// Parent of a node, `NodeIndex::NONE` for roots.
    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        if index.is_none() {
            return NodeIndex::NONE;
        }
        self.parents
            .get(index.0 as usize)
            .copied()
            .unwrap_or(NodeIndex::NONE)
    }

    /// Every node index, in creation order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        (0..self.nodes.len() as u32).map(NodeIndex)
    }

    /// Walk parents upward, starting with the parent of `index`.
    pub fn ancestors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut current = self.parent_of(index);
        std::iter::from_fn(move || {
            if current.is_none() {
                return None;
            }
            let out = current;
            current = self.parent_of(current);
            Some(out)
        })
    }

    /// Nearest ancestor matching `pred`.
    pub fn find_ancestor(
        &self,
        index: NodeIndex,
        mut pred: impl FnMut(&Node) -> bool,
    ) -> Option<NodeIndex> {
        self.ancestors(index)
            .find(|&ancestor| self.get(ancestor).is_some_and(&mut pred))
    }

    /// Text of an identifier, private identifier, or string/numeric literal
    /// (the forms a property name can take).
    pub fn name_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        if let Some(ident) = self.get_identifier(node) {
            return Some(ident.escaped_text.as_str());
        }
        match node.kind {
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral => {
                self.get_literal(node).map(|lit| lit.text.as_str())
            }
            _ => None,
        }
    }

    /// The `name` slot of a named declaration, `NodeIndex::NONE` otherwise.
    pub fn name_of(&self, index: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(index) else {
            return NodeIndex::NONE;
        };
        match &node.data {
            NodeData::TypeParameter(d) => d.name,
            NodeData::Parameter(d) => d.name,
            NodeData::Property(d) => d.name,
            NodeData::Function(d) => d.name,
            NodeData::Class(d) => d.name,
            NodeData::Interface(d) => d.name,
            NodeData::TypeAlias(d) => d.name,
            NodeData::Enum(d) => d.name,
            NodeData::EnumMember(d) => d.name,
            NodeData::Module(d) => d.name,
            NodeData::VariableDeclaration(d) => d.name,
            NodeData::BindingElement(d) => d.name,
            NodeData::PropertyAssignment(d) => d.name,
            NodeData::ImportClause(d) => d.name,
            NodeData::Specifier(d) => d.name,
            NodeData::ImportEquals(d) => d.name,
            NodeData::NamedTupleMember(d) => d.name,
            NodeData::JSDocTag(d) => d.name,
            _ => NodeIndex::NONE,
        }
    }

    /// Explicit type annotation of a declaration, `NodeIndex::NONE` otherwise.
    pub fn type_annotation_of(&self, index: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(index) else {
            return NodeIndex::NONE;
        };
        match &node.data {
            NodeData::Parameter(d) => d.type_annotation,
            NodeData::Property(d) => d.type_annotation,
            NodeData::Function(d) => d.type_annotation,
            NodeData::VariableDeclaration(d) => d.type_annotation,
            NodeData::TypeAlias(d) => d.type_node,
            NodeData::JSDocTag(d) => d.type_expression,
            _ => NodeIndex::NONE,
        }
    }

    /// Initializer of a declaration, `NodeIndex::NONE` otherwise.
    pub fn initializer_of(&self, index: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(index) else {
            return NodeIndex::NONE;
        };
        match &node.data {
            NodeData::Parameter(d) => d.initializer,
            NodeData::Property(d) => d.initializer,
            NodeData::VariableDeclaration(d) => d.initializer,
            NodeData::BindingElement(d) => d.initializer,
            NodeData::EnumMember(d) => d.initializer,
            NodeData::PropertyAssignment(d) => d.initializer,
            _ => NodeIndex::NONE,
        }
    }

    /// Heritage clauses of a class or interface.
    pub fn heritage_clauses_of(&self, index: NodeIndex) -> Option<&NodeList> {
        let node = self.get(index)?;
        match &node.data {
            NodeData::Class(d) => d.heritage_clauses.as_ref(),
            NodeData::Interface(d) => d.heritage_clauses.as_ref(),
            _ => None,
        }
    }

    /// True when a variable declaration sits in a `const` declaration list.
    pub fn is_const_declaration(&self, index: NodeIndex) -> bool {
        if !self.is_kind(index, SyntaxKind::VariableDeclaration) {
            return false;
        }
        self.get(self.parent_of(index))
            .is_some_and(|list| list.flags.contains(crate::NodeFlags::CONST))
    }

    /// Skip parentheses, non-null assertions and `satisfies` around an
    /// expression.
    pub fn skip_outer_expressions(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(node) = self.get(index) {
            index = match node.kind {
                SyntaxKind::ParenthesizedExpression | SyntaxKind::NonNullExpression => {
                    match self.get_unary_expr_ex(node) {
                        Some(inner) => inner.expression,
                        None => return index,
                    }
                }
                SyntaxKind::SatisfiesExpression => match self.get_type_assertion(node) {
                    Some(inner) => inner.expression,
                    None => return index,
                },
                _ => return index,
            };
        }
        index
    }
}
