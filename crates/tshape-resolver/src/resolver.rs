//! Declaration resolver dispatch.
//!
//! `DeclarationResolver::dispatch` is a single exhaustive `match` over
//! `SyntaxKind`. There is no wildcard arm: a new kind does not compile until it
//! is given a handler here. The handlers themselves live in `handlers/`, one
//! module per syntactic category.

use crate::classify::{is_trackable, type_identity_symbol};
use crate::definition::{LazyType, Resolution, ResolveOptions, ResolvedDefinition};
use crate::error::ShapeError;
use crate::guard::{RecursionGuard, RecursionResult};
use std::cell::RefCell;
use tracing::{Span, debug_span, trace, warn};
use tshape_ast::{NodeArena, NodeIndex, SyntaxKind};
use tshape_common::limits::MAX_RESOLVE_DEPTH;
use tshape_host::{SymbolId, TypeQuery};

/// `Ok(None)`: no node, or nothing could be resolved.
/// `Ok(Some(Resolution::Nothing))`: the node deliberately refers to nothing.
pub type ResolveResult = Result<Option<Resolution>, ShapeError>;

pub struct DeclarationResolver<'h> {
    host: &'h dyn TypeQuery,
    options: ResolveOptions,
    guard: RefCell<RecursionGuard<NodeIndex>>,
    span: Span,
}

impl<'h> DeclarationResolver<'h> {
    pub fn new(host: &'h dyn TypeQuery, options: ResolveOptions) -> Self {
        let span = debug_span!(
            "declaration_resolution",
            file = host.arena().file_name(),
            choose_local = options.choose_local
        );
        DeclarationResolver {
            host,
            options,
            guard: RefCell::new(RecursionGuard::new(MAX_RESOLVE_DEPTH)),
            span,
        }
    }

    #[inline]
    pub fn host(&self) -> &'h dyn TypeQuery {
        self.host
    }

    #[inline]
    pub fn arena(&self) -> &'h NodeArena {
        self.host.arena()
    }

    #[inline]
    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    #[inline]
    pub(crate) fn span(&self) -> &Span {
        &self.span
    }

    /// Resolve the declaration `node` refers to.
    pub fn resolve(&self, node: NodeIndex) -> ResolveResult {
        self.resolve_inner(node)
    }

    /// Like `resolve`, collapsing `Resolution::Nothing` into `None`.
    pub fn resolve_definition(
        &self,
        node: NodeIndex,
    ) -> Result<Option<ResolvedDefinition>, ShapeError> {
        Ok(self.resolve_inner(node)?.and_then(Resolution::into_definition))
    }

    pub fn follow(&self, definition: ResolvedDefinition) -> Result<ResolvedDefinition, ShapeError> {
        crate::follow::follow(self, definition)
    }

    pub(crate) fn resolve_inner(&self, node: NodeIndex) -> ResolveResult {
        let Some(kind) = self.arena().kind(node) else {
            return Ok(None);
        };
        let entered = self.guard.borrow_mut().enter(node);
        match entered {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(parent: &self.span, node = node.0, %kind, "resolution cycle");
                return Ok(None);
            }
            RecursionResult::DepthExceeded => {
                warn!(parent: &self.span, node = node.0, %kind, "resolution depth exceeded");
                return Ok(None);
            }
        }
        let result = self.dispatch(node, kind);
        self.guard.borrow_mut().leave(node);
        result.map_err(|err| err.at_node(self.arena(), node, ""))
    }

    fn dispatch(&self, node: NodeIndex, kind: SyntaxKind) -> ResolveResult {
        use SyntaxKind as K;
        match kind {
            // Literals
            K::NumericLiteral
            | K::BigIntLiteral
            | K::StringLiteral
            | K::JsxText
            | K::RegularExpressionLiteral
            | K::NoSubstitutionTemplateLiteral => self.literal(node),
            K::TemplateHead | K::TemplateMiddle | K::TemplateTail => self.template_part(node),

            // Identifiers and keyword expressions
            K::Identifier | K::PrivateIdentifier => self.identifier(node),
            K::TrueKeyword | K::FalseKeyword | K::NullKeyword => self.literal(node),
            K::ThisKeyword | K::ThisType => self.this_keyword(node),
            K::SuperKeyword => self.super_keyword(node),
            K::ImportKeyword => Ok(None),

            // Type keywords
            K::AnyKeyword
            | K::UnknownKeyword
            | K::NeverKeyword
            | K::VoidKeyword
            | K::UndefinedKeyword
            | K::BooleanKeyword
            | K::NumberKeyword
            | K::StringKeyword
            | K::BigIntKeyword
            | K::SymbolKeyword
            | K::ObjectKeyword
            | K::IntrinsicKeyword => self.type_only(node),

            // Names
            K::QualifiedName => self.qualified_name(node),
            K::ComputedPropertyName | K::Decorator => self.wrapped_expression(node),

            // Signature elements and members
            K::TypeParameter => self.own_symbol(node),
            K::Parameter => self.parameter(node),
            K::PropertySignature
            | K::PropertyDeclaration
            | K::MethodSignature
            | K::MethodDeclaration
            | K::GetAccessor
            | K::SetAccessor => self.member_declaration(node),
            K::Constructor => self.constructor(node),
            K::ClassStaticBlockDeclaration | K::SemicolonClassElement => self.nothing(),
            K::CallSignature | K::ConstructSignature | K::IndexSignature => self.own_symbol(node),

            // Type nodes
            K::TypeReference | K::ExpressionWithTypeArguments => self.type_reference(node),
            K::TypeQuery => self.type_query(node),
            K::ImportType => self.direct(node),
            K::ParenthesizedType
            | K::OptionalType
            | K::RestType
            | K::LiteralType
            | K::JSDocTypeExpression
            | K::JSDocNullableType
            | K::JSDocNonNullableType
            | K::JSDocOptionalType
            | K::JSDocVariadicType => self.wrapped_type(node),
            K::FunctionType
            | K::ConstructorType
            | K::TypeLiteral
            | K::ArrayType
            | K::TupleType
            | K::UnionType
            | K::IntersectionType
            | K::ConditionalType
            | K::InferType
            | K::TypeOperator
            | K::IndexedAccessType
            | K::MappedType
            | K::TemplateLiteralType
            | K::TemplateLiteralTypeSpan
            | K::TypePredicate
            | K::NamedTupleMember => self.direct(node),

            // Destructuring
            K::ObjectBindingPattern | K::ArrayBindingPattern => self.binding_pattern(node),
            K::BindingElement => self.binding_element(node),

            // Expressions
            K::ArrayLiteralExpression | K::ObjectLiteralExpression => {
                self.contextual_or_direct(node)
            }
            K::PropertyAccessExpression | K::ElementAccessExpression => {
                self.property_access(node)
            }
            K::CallExpression | K::NewExpression | K::TaggedTemplateExpression => {
                self.direct(node)
            }
            K::TypeAssertionExpression | K::AsExpression => self.type_assertion(node),
            K::SatisfiesExpression => self.satisfies(node),
            K::ParenthesizedExpression | K::NonNullExpression | K::SpreadElement => {
                self.wrapped_expression(node)
            }
            K::FunctionExpression | K::ArrowFunction | K::ClassExpression => {
                self.own_symbol(node)
            }
            K::DeleteExpression
            | K::TypeOfExpression
            | K::VoidExpression
            | K::AwaitExpression
            | K::PrefixUnaryExpression
            | K::PostfixUnaryExpression
            | K::BinaryExpression
            | K::ConditionalExpression
            | K::TemplateExpression
            | K::MetaProperty => self.direct(node),
            K::YieldExpression | K::OmittedExpression => self.nothing(),
            K::TemplateSpan => self.wrapped_expression(node),

            // Statements
            K::VariableStatement => self.variable_statement(node),
            K::ExpressionStatement | K::ThrowStatement => self.wrapped_expression(node),
            K::ReturnStatement => self.return_statement(node),
            K::Block
            | K::EmptyStatement
            | K::IfStatement
            | K::DoStatement
            | K::WhileStatement
            | K::ForStatement
            | K::ForInStatement
            | K::ForOfStatement
            | K::ContinueStatement
            | K::BreakStatement
            | K::WithStatement
            | K::SwitchStatement
            | K::LabeledStatement
            | K::TryStatement
            | K::DebuggerStatement => self.nothing(),

            // Declarations
            K::VariableDeclaration => self.variable_declaration(node),
            K::VariableDeclarationList => self.variable_declaration_list(node),
            K::FunctionDeclaration
            | K::ClassDeclaration
            | K::InterfaceDeclaration
            | K::TypeAliasDeclaration
            | K::EnumDeclaration
            | K::ModuleDeclaration
            | K::NamespaceExportDeclaration => self.own_symbol(node),
            K::ModuleBlock | K::CaseBlock | K::NamedImports | K::NamedExports => self.nothing(),
            K::ImportEqualsDeclaration => self.import_equals(node),
            K::ImportDeclaration | K::ExportDeclaration => self.module_declaration(node),
            K::ImportClause => self.import_clause(node),
            K::NamespaceImport | K::NamespaceExport => self.namespace_import(node),
            K::ImportSpecifier | K::ExportSpecifier => self.specifier(node),
            K::ExportAssignment => self.wrapped_expression(node),
            K::ExternalModuleReference => self.external_module_reference(node),
            K::MissingDeclaration => Ok(None),

            // JSX
            K::JsxElement => self.jsx_element(node),
            K::JsxSelfClosingElement | K::JsxOpeningElement | K::JsxClosingElement => {
                self.jsx_tag(node)
            }
            K::JsxFragment | K::JsxOpeningFragment | K::JsxClosingFragment => self.nothing(),
            K::JsxAttribute => self.jsx_attribute(node),
            K::JsxAttributes => self.contextual_or_direct(node),
            K::JsxSpreadAttribute | K::JsxExpression => self.wrapped_expression(node),
            K::JsxNamespacedName => self.direct(node),

            // Clauses
            K::CaseClause | K::DefaultClause => self.nothing(),
            K::HeritageClause => self.heritage_clause(node),
            K::CatchClause => self.catch_clause(node),

            // Object literal members
            K::PropertyAssignment | K::ShorthandPropertyAssignment => {
                self.property_assignment(node)
            }
            K::SpreadAssignment => self.wrapped_expression(node),

            K::EnumMember => self.enum_member(node),
            K::SourceFile => self.own_symbol(node),

            // JSDoc
            K::JSDocNameReference => self.type_reference(node),
            K::JSDocAllType | K::JSDocUnknownType => self.type_only(node),
            K::JSDocFunctionType | K::JSDocSignature | K::JSDocTypeLiteral => self.direct(node),
            K::JSDocTypedefTag | K::JSDocCallbackTag => self.own_symbol(node),
            K::JSDoc
            | K::JSDocTag
            | K::JSDocSeeTag
            | K::JSDocDeprecatedTag
            | K::JSDocTemplateTag => self.nothing(),
            K::JSDocAugmentsTag
            | K::JSDocImplementsTag
            | K::JSDocParameterTag
            | K::JSDocReturnTag
            | K::JSDocThisTag
            | K::JSDocTypeTag
            | K::JSDocPropertyTag
            | K::JSDocSatisfiesTag => self.jsdoc_tag(node),
        }
    }

    // =========================================================================
    // Shared lookups
    // =========================================================================

    /// Type and symbol of the node itself: the type's alias or nominal symbol
    /// first, then the symbol bound at the node.
    pub(crate) fn direct(&self, node: NodeIndex) -> ResolveResult {
        let ty = self.host.type_at(node);
        let symbol = type_identity_symbol(self.host, ty).or_else(|| self.symbol_at(node));
        match symbol {
            Some(symbol) => Ok(Some(Resolution::Resolved(ResolvedDefinition::new(
                Some(symbol),
                self.primary_declaration(symbol),
                LazyType::known(ty),
            )))),
            None if ty.is_any_like() => Ok(None),
            None => Ok(Some(Resolution::Resolved(ResolvedDefinition::type_only(
                LazyType::known(ty),
            )))),
        }
    }

    /// Symbol of the contextual type, when the node has one that is not `any`
    /// and whose symbol has a declaration.
    pub(crate) fn contextual(&self, node: NodeIndex) -> ResolveResult {
        let Some(ty) = self
            .host
            .contextual_type_of(node)
            .filter(|ty| !ty.is_any_like())
        else {
            return Ok(None);
        };
        let Some(symbol) =
            type_identity_symbol(self.host, ty).filter(|&symbol| is_trackable(self.host, symbol))
        else {
            return Ok(None);
        };
        Ok(Some(Resolution::Resolved(ResolvedDefinition::new(
            Some(symbol),
            self.primary_declaration(symbol),
            LazyType::known(ty),
        ))))
    }

    pub(crate) fn contextual_or_direct(&self, node: NodeIndex) -> ResolveResult {
        match self.contextual(node)? {
            Some(found) => Ok(Some(found)),
            None => self.direct(node),
        }
    }

    /// The declaration itself, with the symbol bound to it.
    pub(crate) fn own_symbol(&self, decl: NodeIndex) -> ResolveResult {
        match self.symbol_at(decl) {
            Some(symbol) => Ok(Some(Resolution::Resolved(ResolvedDefinition::new(
                Some(symbol),
                decl,
                LazyType::of_symbol_at(symbol, decl),
            )))),
            None => self.direct(decl),
        }
    }

    pub(crate) fn type_only(&self, node: NodeIndex) -> ResolveResult {
        Ok(Some(Resolution::Resolved(ResolvedDefinition::type_only(
            LazyType::of_node(node),
        ))))
    }

    #[inline]
    pub(crate) fn nothing(&self) -> ResolveResult {
        Ok(Some(Resolution::Nothing))
    }

    /// Symbol bound at the node, or at its name.
    pub(crate) fn symbol_at(&self, node: NodeIndex) -> Option<SymbolId> {
        if let Some(symbol) = self.host.symbol_at(node) {
            return Some(symbol);
        }
        let arena = self.arena();
        let node_ref = arena.get(node)?;
        let name = match node_ref.kind {
            SyntaxKind::PropertyAccessExpression => arena
                .get_access_expr(node_ref)
                .map(|access| access.name_or_argument)?,
            SyntaxKind::QualifiedName => arena.get_qualified_name(node_ref).map(|q| q.right)?,
            _ => arena.name_of(node),
        };
        if name.is_none() {
            return None;
        }
        self.host.symbol_at(name)
    }

    pub(crate) fn primary_declaration(&self, symbol: SymbolId) -> NodeIndex {
        self.host
            .symbol_info(symbol)
            .map(|info| info.primary_declaration())
            .unwrap_or(NodeIndex::NONE)
    }

    /// Definition for a symbol found by a type lookup (a property, an export).
    pub(crate) fn symbol_definition(&self, symbol: SymbolId, at: NodeIndex) -> ResolvedDefinition {
        ResolvedDefinition::new(
            Some(symbol),
            self.primary_declaration(symbol),
            LazyType::of_symbol_at(symbol, at),
        )
    }

    /// Resolve `node`, keeping the result only when it carries a declaration.
    pub(crate) fn resolve_declared(
        &self,
        node: NodeIndex,
    ) -> Result<Option<ResolvedDefinition>, ShapeError> {
        Ok(self
            .resolve_definition(node)?
            .filter(ResolvedDefinition::has_declaration))
    }

    pub(crate) fn shape_error(&self, expected: &'static str, node: NodeIndex) -> ShapeError {
        ShapeError::unexpected(
            expected,
            self.arena()
                .kind(node)
                .unwrap_or(SyntaxKind::MissingDeclaration),
        )
    }
}

/// Resolve `node` with a fresh resolver.
pub fn resolve_declaration(
    host: &dyn TypeQuery,
    node: NodeIndex,
    options: ResolveOptions,
) -> ResolveResult {
    DeclarationResolver::new(host, options).resolve(node)
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
