//! Type Schema Evaluator dispatch.
//!
//! `SchemaEvaluator::dispatch` is the value-side counterpart of the resolver's
//! table: one exhaustive `match` over `SyntaxKind` with no wildcard arm.
//! Handlers live in the sibling modules, grouped by category:
//!
//! - `types`: host types to schemas, named definitions and cycle breaking
//! - `values`: identifiers, member access, operators and wrappers
//! - `literals`: literal tokens, array/object literal shapes and JSX
//! - `destructuring`: binding patterns and binding elements
//! - `functions`: function values, inline calls and parameter binding

mod destructuring;
mod functions;
mod literals;
mod types;
mod values;

use crate::context::SchemaContext;
use crate::schema::SchemaNode;
use tracing::debug;
use tshape_ast::{NodeArena, NodeIndex, SyntaxKind};
use tshape_host::{IntrinsicKind, TypeId, TypeQuery};
use tshape_resolver::{DeclarationResolver, ResolveOptions, ShapeError};

/// `Ok(None)`: no node, or the node has no value (statements, clauses).
pub type SchemaResult = Result<Option<SchemaNode>, ShapeError>;

pub struct SchemaEvaluator<'h> {
    host: &'h dyn TypeQuery,
    resolver: DeclarationResolver<'h>,
}

impl<'h> SchemaEvaluator<'h> {
    pub fn new(host: &'h dyn TypeQuery, resolve_options: ResolveOptions) -> Self {
        SchemaEvaluator {
            host,
            resolver: DeclarationResolver::new(host, resolve_options),
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
    pub fn resolver(&self) -> &DeclarationResolver<'h> {
        &self.resolver
    }

    /// Schema of the value `node` denotes.
    pub fn evaluate_node(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let Some(kind) = self.arena().kind(node) else {
            return Ok(None);
        };
        self.dispatch(node, kind, ctx)
            .map_err(|err| err.at_node(self.arena(), node, ctx.history()))
    }

    /// Structural descent into a child node: spends one unit of depth, and
    /// yields the recursion sentinel once the budget is gone.
    pub(crate) fn descend_into(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
        label: &str,
    ) -> SchemaResult {
        if node.is_none() {
            return Ok(None);
        }
        if ctx.is_exhausted() {
            debug!(parent: ctx.span(), node = node.0, history = ctx.history(), "schema depth exhausted");
            return Ok(Some(SchemaNode::recursion_limit()));
        }
        self.evaluate_node(node, &ctx.descend(label))
    }

    /// Like `descend_into`, with `undefined` standing in for a missing node.
    pub(crate) fn descend_or_undefined(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
        label: &str,
    ) -> Result<SchemaNode, ShapeError> {
        Ok(self
            .descend_into(node, ctx, label)?
            .unwrap_or_else(|| SchemaNode::primitive(IntrinsicKind::Undefined)))
    }

    fn dispatch(&self, node: NodeIndex, kind: SyntaxKind, ctx: &SchemaContext) -> SchemaResult {
        use SyntaxKind as K;
        match kind {
            // Literals
            K::NumericLiteral
            | K::BigIntLiteral
            | K::StringLiteral
            | K::JsxText
            | K::NoSubstitutionTemplateLiteral
            | K::TemplateHead
            | K::TemplateMiddle
            | K::TemplateTail => self.literal(node),
            K::RegularExpressionLiteral => self.node_type(node, ctx),

            // Identifiers and keyword expressions
            K::Identifier | K::PrivateIdentifier => self.identifier(node, ctx),
            K::TrueKeyword | K::FalseKeyword | K::NullKeyword => self.literal(node),
            K::ThisKeyword | K::ThisType | K::SuperKeyword | K::ImportKeyword => {
                self.node_type(node, ctx)
            }

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
            | K::ObjectKeyword => self.type_keyword(kind),
            K::IntrinsicKeyword => self.node_type(node, ctx),

            // Names
            K::QualifiedName => self.qualified_name(node, ctx),
            K::ComputedPropertyName | K::Decorator => self.wrapped_expression(node, ctx),

            // Signature elements and members
            K::TypeParameter => self.node_type(node, ctx),
            K::Parameter => self.parameter_value(node, ctx).map(Some),
            K::PropertySignature | K::PropertyDeclaration => self.property_member(node, ctx),
            K::MethodSignature
            | K::MethodDeclaration
            | K::GetAccessor
            | K::SetAccessor
            | K::Constructor => self.function_value(node, ctx).map(Some),
            K::ClassStaticBlockDeclaration | K::SemicolonClassElement => Ok(None),
            K::CallSignature | K::ConstructSignature | K::IndexSignature => {
                self.node_type(node, ctx)
            }

            // Type nodes
            K::TypeReference
            | K::ExpressionWithTypeArguments
            | K::TypeQuery
            | K::ImportType
            | K::FunctionType
            | K::ConstructorType
            | K::TypeLiteral
            | K::TupleType
            | K::UnionType
            | K::IntersectionType
            | K::ConditionalType
            | K::TypeOperator
            | K::IndexedAccessType
            | K::MappedType
            | K::TemplateLiteralType
            | K::TemplateLiteralTypeSpan
            | K::TypePredicate
            | K::NamedTupleMember => self.node_type(node, ctx),
            K::ParenthesizedType
            | K::ArrayType
            | K::OptionalType
            | K::RestType
            | K::InferType
            | K::LiteralType
            | K::JSDocTypeExpression
            | K::JSDocNullableType
            | K::JSDocNonNullableType
            | K::JSDocOptionalType
            | K::JSDocVariadicType => self.wrapped_type(node, ctx),

            // Destructuring
            K::ObjectBindingPattern | K::ArrayBindingPattern => {
                self.binding_pattern_source(node, ctx)
            }
            K::BindingElement => self.binding_element(node, ctx).map(Some),

            // Expressions
            K::ArrayLiteralExpression => self.array_literal(node, ctx).map(Some),
            K::ObjectLiteralExpression => self.object_literal(node, ctx).map(Some),
            K::PropertyAccessExpression | K::ElementAccessExpression => {
                self.member_access(node, ctx)
            }
            K::CallExpression => self.call(node, ctx),
            K::NewExpression | K::TaggedTemplateExpression => self.node_type(node, ctx),
            K::TypeAssertionExpression | K::AsExpression => self.type_assertion(node, ctx),
            K::SatisfiesExpression => self.satisfies(node, ctx),
            K::ParenthesizedExpression | K::SpreadElement => self.wrapped_expression(node, ctx),
            K::NonNullExpression => self.non_null(node, ctx),
            K::FunctionExpression | K::ArrowFunction => self.function_value(node, ctx).map(Some),
            K::ClassExpression => self.node_type(node, ctx),
            K::DeleteExpression => Ok(Some(SchemaNode::primitive(IntrinsicKind::Boolean))),
            K::TypeOfExpression => self.type_of(node, ctx),
            K::VoidExpression => Ok(Some(SchemaNode::primitive(IntrinsicKind::Undefined))),
            K::AwaitExpression | K::YieldExpression | K::MetaProperty => self.node_type(node, ctx),
            K::PrefixUnaryExpression => self.prefix_unary(node, ctx),
            K::PostfixUnaryExpression => self.postfix_unary(node, ctx),
            K::BinaryExpression => self.binary(node, ctx),
            K::ConditionalExpression => self.conditional(node, ctx),
            K::TemplateExpression => self.template_expression(node, ctx),
            K::OmittedExpression => Ok(Some(SchemaNode::primitive(IntrinsicKind::Undefined))),
            K::TemplateSpan => self.wrapped_expression(node, ctx),

            // Statements
            K::VariableStatement => self.variable_statement(node, ctx),
            K::ExpressionStatement | K::ThrowStatement => self.wrapped_expression(node, ctx),
            K::ReturnStatement => self.return_statement(node, ctx),
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
            | K::DebuggerStatement => Ok(None),

            // Declarations
            K::VariableDeclaration => self.variable_declaration(node, ctx).map(Some),
            K::VariableDeclarationList => self.variable_declaration_list(node, ctx),
            K::FunctionDeclaration => self.function_value(node, ctx).map(Some),
            K::ClassDeclaration
            | K::InterfaceDeclaration
            | K::TypeAliasDeclaration
            | K::EnumDeclaration
            | K::ModuleDeclaration => self.node_type(node, ctx),
            K::NamespaceExportDeclaration
            | K::ModuleBlock
            | K::CaseBlock
            | K::NamedImports
            | K::NamedExports
            | K::ImportEqualsDeclaration
            | K::ImportDeclaration
            | K::ExportDeclaration
            | K::ExternalModuleReference
            | K::MissingDeclaration => Ok(None),
            K::ImportClause
            | K::NamespaceImport
            | K::NamespaceExport
            | K::ImportSpecifier
            | K::ExportSpecifier => self.imported_value(node, ctx),
            K::ExportAssignment => self.wrapped_expression(node, ctx),

            // JSX
            K::JsxElement
            | K::JsxSelfClosingElement
            | K::JsxOpeningElement
            | K::JsxClosingElement
            | K::JsxFragment
            | K::JsxOpeningFragment
            | K::JsxClosingFragment
            | K::JsxNamespacedName => self.node_type(node, ctx),
            K::JsxAttribute => self.jsx_attribute(node, ctx).map(Some),
            K::JsxAttributes => self.jsx_attributes(node, ctx).map(Some),
            K::JsxSpreadAttribute | K::JsxExpression => self.wrapped_expression(node, ctx),

            // Clauses
            K::CaseClause | K::DefaultClause | K::HeritageClause | K::CatchClause => Ok(None),

            // Object literal members
            K::PropertyAssignment => self.property_assignment(node, ctx),
            K::ShorthandPropertyAssignment => self.shorthand_property(node, ctx),
            K::SpreadAssignment => self.wrapped_expression(node, ctx),

            K::EnumMember => self.enum_member(node, ctx),
            K::SourceFile => Ok(None),

            // JSDoc
            K::JSDocNameReference
            | K::JSDocFunctionType
            | K::JSDocSignature
            | K::JSDocTypeLiteral
            | K::JSDocTypedefTag
            | K::JSDocCallbackTag => self.node_type(node, ctx),
            K::JSDocAllType => Ok(Some(SchemaNode::primitive(IntrinsicKind::Any))),
            K::JSDocUnknownType => Ok(Some(SchemaNode::unknown())),
            K::JSDoc
            | K::JSDocTag
            | K::JSDocSeeTag
            | K::JSDocDeprecatedTag
            | K::JSDocTemplateTag => Ok(None),
            K::JSDocAugmentsTag
            | K::JSDocImplementsTag
            | K::JSDocParameterTag
            | K::JSDocReturnTag
            | K::JSDocThisTag
            | K::JSDocTypeTag
            | K::JSDocPropertyTag
            | K::JSDocSatisfiesTag => self.jsdoc_tag(node, ctx),
        }
    }

    // =========================================================================
    // Shared lookups
    // =========================================================================

    /// Schema of the host type at the node.
    pub(crate) fn node_type(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let ty = self.host.type_at(node);
        self.evaluate_type(ty, ctx).map(Some)
    }

    /// Schema of the type written at a type annotation.
    pub(crate) fn annotation_type(
        &self,
        annotation: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let ty = self.host.type_at(annotation);
        if ty == TypeId::ERROR
            && let Some(schema) = self.evaluate_node(annotation, ctx)?
        {
            return Ok(schema);
        }
        self.evaluate_type(ty, ctx)
    }

    pub(crate) fn shape_error(&self, expected: &'static str, node: NodeIndex) -> ShapeError {
        match self.arena().kind(node) {
            Some(found) => ShapeError::unexpected(expected, found),
            None => ShapeError::InvariantViolation(format!("expected {expected}, found no node")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/evaluator_tests.rs"]
mod tests;
