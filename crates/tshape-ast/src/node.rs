//! Node headers and typed payloads.
//!
//! A `Node` is a small header (kind, flags, span) plus a `NodeData` payload.
//! Payload structs are shared between kinds with the same shape, e.g.
//! `FunctionData` backs every function-like kind and `AccessExprData` backs both
//! property and element access.

use crate::flags::{ModifierFlags, NodeFlags};
use crate::syntax_kind::{SyntaxKind, TokenKind};
use serde::Serialize;
use smallvec::SmallVec;
use tshape_common::Atom;

/// Index of a node in its `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Absent node (`undefined` in the host tree).
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == NodeIndex::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != NodeIndex::NONE
    }

    /// `None` for `NodeIndex::NONE`, so lookups can chain with `?`.
    #[inline]
    pub fn into_option(self) -> Option<NodeIndex> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

/// An ordered list of child nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        NodeList { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<NodeIndex> {
        self.nodes.get(index).copied()
    }

    /// Position of `node` in the list.
    pub fn position(&self, node: NodeIndex) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        NodeList { nodes }
    }
}

/// A node header and its payload.
#[derive(Clone, Debug, Serialize)]
pub struct Node {
    pub kind: SyntaxKind,
    pub flags: NodeFlags,
    pub modifiers: ModifierFlags,
    /// Start offset in the source text
    pub pos: u32,
    /// End offset in the source text
    pub end: u32,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn has_modifier(&self, modifier: ModifierFlags) -> bool {
        self.modifiers.contains(modifier)
    }
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub atom: Atom,
    pub escaped_text: String,
}

/// Numeric, bigint, string, regex, JSX text and template fragment literals.
#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    pub text: String,
    /// Parsed value of numeric literals
    pub value: Option<f64>,
}

/// `left.right`, also used for `namespace:name` in JSX.
#[derive(Clone, Debug, Serialize)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

/// Single-expression wrappers: parentheses, spread, await, yield, typeof,
/// computed names, decorators, expression/return/throw statements, JSX
/// expressions and external module references.
#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprDataEx {
    pub expression: NodeIndex,
    /// `yield*`
    pub asterisk_token: bool,
}

/// Single-type wrappers: `(T)`, `T[]`, `T?`, `...T`, literal types, and the
/// JSDoc type modifiers.
#[derive(Clone, Debug, Serialize)]
pub struct WrappedTypeData {
    pub type_node: NodeIndex,
}

/// `Name<Args>`, `typeof name`, `Base<Args>` in heritage clauses and
/// `import("mod").Name`.
#[derive(Clone, Debug, Serialize)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeOperatorData {
    pub operator: TokenKind,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Property signatures and class property declarations.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyData {
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Every function-like kind: declarations, expressions, arrows, methods,
/// accessors, signatures and function types.
#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    pub body: NodeIndex,
    pub asterisk_token: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct BlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
}

/// Array and object literal expressions.
#[derive(Clone, Debug, Serialize)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingPatternData {
    pub elements: NodeList,
}

/// Union, intersection and tuple types.
#[derive(Clone, Debug, Serialize)]
pub struct CompositeTypeData {
    pub types: NodeList,
}

/// Type literals and JSDoc type literals.
#[derive(Clone, Debug, Serialize)]
pub struct TypeLiteralData {
    pub members: NodeList,
}

/// Named imports/exports and JSX attribute lists.
#[derive(Clone, Debug, Serialize)]
pub struct NamedImportsData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub template: NodeIndex,
}

/// Property access (`name_or_argument` is the name) and element access
/// (`name_or_argument` is the argument expression).
#[derive(Clone, Debug, Serialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    pub question_dot_token: bool,
}

/// `<T>expr`, `expr as T`, `expr satisfies T`.
#[derive(Clone, Debug, Serialize)]
pub struct TypeAssertionData {
    pub expression: NodeIndex,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprData {
    pub operator: TokenKind,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: TokenKind,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalTypeData {
    pub check_type: NodeIndex,
    pub extends_type: NodeIndex,
    pub true_type: NodeIndex,
    pub false_type: NodeIndex,
}

/// Template expressions and template literal types.
#[derive(Clone, Debug, Serialize)]
pub struct TemplateExprData {
    pub head: NodeIndex,
    pub template_spans: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateSpanData {
    pub expression: NodeIndex,
    pub literal: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct InterfaceData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

/// Type aliases and JSDoc `@typedef` / `@callback`.
#[derive(Clone, Debug, Serialize)]
pub struct TypeAliasData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumData {
    pub name: NodeIndex,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModuleData {
    pub name: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableStatementData {
    pub declaration_list: NodeIndex,
}

/// Declaration list; `NodeFlags::CONST` / `NodeFlags::LET` live on this node.
#[derive(Clone, Debug, Serialize)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub exclamation_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingElementData {
    pub dot_dot_dot_token: bool,
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// `name: value`, shorthand `name`, and JSX `name={value}`.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct HeritageData {
    pub token: TokenKind,
    pub types: NodeList,
}

/// Import declarations (`import_clause`) and export declarations (the named
/// exports or namespace export sit in `import_clause`).
#[derive(Clone, Debug, Serialize)]
pub struct ImportDeclData {
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportClauseData {
    pub name: NodeIndex,
    pub named_bindings: NodeIndex,
}

/// Import/export specifiers and namespace imports/exports.
#[derive(Clone, Debug, Serialize)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportEqualsData {
    pub name: NodeIndex,
    pub module_reference: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// `do`, `while`, `for`, `for-in`, `for-of` and `with`.
#[derive(Clone, Debug, Serialize)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct JumpData {
    pub label: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct LabeledData {
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub case_block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct CaseClauseData {
    pub expression: NodeIndex,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct CatchClauseData {
    pub variable_declaration: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct MappedTypeData {
    pub type_parameter: NodeIndex,
    pub name_type: NodeIndex,
    pub type_node: NodeIndex,
    pub readonly_token: bool,
    pub question_token: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexedAccessTypeData {
    pub object_type: NodeIndex,
    pub index_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypePredicateData {
    pub asserts: bool,
    pub parameter_name: NodeIndex,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct NamedTupleMemberData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_node: NodeIndex,
}

/// `new.target`, `import.meta`.
#[derive(Clone, Debug, Serialize)]
pub struct MetaPropertyData {
    pub keyword_token: TokenKind,
    pub name: NodeIndex,
}

/// JSX elements and fragments.
#[derive(Clone, Debug, Serialize)]
pub struct JsxElementData {
    pub opening_element: NodeIndex,
    pub children: NodeList,
    pub closing_element: NodeIndex,
}

/// Opening and self-closing JSX elements.
#[derive(Clone, Debug, Serialize)]
pub struct JsxOpeningData {
    pub tag_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub attributes: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct JsxClosingData {
    pub tag_name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct JSDocData {
    pub comment: String,
    pub tags: NodeList,
}

/// Every JSDoc tag except `@typedef` and `@callback`.
#[derive(Clone, Debug, Serialize)]
pub struct JSDocTagData {
    pub tag_name: NodeIndex,
    pub name: NodeIndex,
    pub type_expression: NodeIndex,
    pub comment: String,
}

/// Node payload, selected by the node's kind.
#[derive(Clone, Debug, Serialize)]
pub enum NodeData {
    /// Tokens and keywords
    None,
    Identifier(IdentifierData),
    Literal(LiteralData),
    QualifiedName(QualifiedNameData),
    UnaryExprEx(UnaryExprDataEx),
    WrappedType(WrappedTypeData),
    TypeRef(TypeRefData),
    TypeOperator(TypeOperatorData),
    TypeParameter(TypeParameterData),
    Parameter(ParameterData),
    Property(PropertyData),
    Function(FunctionData),
    Block(BlockData),
    SourceFile(SourceFileData),
    LiteralExpr(LiteralExprData),
    BindingPattern(BindingPatternData),
    CompositeType(CompositeTypeData),
    TypeLiteral(TypeLiteralData),
    NamedImports(NamedImportsData),
    Call(CallExprData),
    TaggedTemplate(TaggedTemplateData),
    Access(AccessExprData),
    TypeAssertion(TypeAssertionData),
    UnaryExpr(UnaryExprData),
    Binary(BinaryExprData),
    Conditional(ConditionalExprData),
    ConditionalType(ConditionalTypeData),
    Template(TemplateExprData),
    TemplateSpan(TemplateSpanData),
    Class(ClassData),
    Interface(InterfaceData),
    TypeAlias(TypeAliasData),
    Enum(EnumData),
    EnumMember(EnumMemberData),
    Module(ModuleData),
    VariableStatement(VariableStatementData),
    Variable(VariableData),
    VariableDeclaration(VariableDeclarationData),
    BindingElement(BindingElementData),
    PropertyAssignment(PropertyAssignmentData),
    Heritage(HeritageData),
    ImportDecl(ImportDeclData),
    ImportClause(ImportClauseData),
    Specifier(SpecifierData),
    ImportEquals(ImportEqualsData),
    If(IfStatementData),
    Loop(LoopData),
    Jump(JumpData),
    Labeled(LabeledData),
    Switch(SwitchData),
    CaseClause(CaseClauseData),
    Try(TryData),
    CatchClause(CatchClauseData),
    MappedType(MappedTypeData),
    IndexedAccessType(IndexedAccessTypeData),
    TypePredicate(TypePredicateData),
    NamedTupleMember(NamedTupleMemberData),
    MetaProperty(MetaPropertyData),
    JsxElement(JsxElementData),
    JsxOpening(JsxOpeningData),
    JsxClosing(JsxClosingData),
    JSDoc(JSDocData),
    JSDocTag(JSDocTagData),
}

const NONE: NodeIndex = NodeIndex::NONE;

fn empty_list() -> NodeList {
    NodeList::default()
}

impl NodeData {
    /// The minimal valid payload for `kind`: every child absent, every list
    /// empty. Used for synthesized nodes.
    pub fn empty_for(kind: SyntaxKind) -> NodeData {
        use SyntaxKind as K;
        match kind {
            K::NumericLiteral
            | K::BigIntLiteral
            | K::StringLiteral
            | K::JsxText
            | K::RegularExpressionLiteral
            | K::NoSubstitutionTemplateLiteral
            | K::TemplateHead
            | K::TemplateMiddle
            | K::TemplateTail => NodeData::Literal(LiteralData {
                text: String::new(),
                value: None,
            }),
            K::Identifier | K::PrivateIdentifier => NodeData::Identifier(IdentifierData {
                atom: Atom::NONE,
                escaped_text: String::new(),
            }),
            K::TrueKeyword
            | K::FalseKeyword
            | K::NullKeyword
            | K::ThisKeyword
            | K::SuperKeyword
            | K::ImportKeyword
            | K::AnyKeyword
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
            | K::IntrinsicKeyword
            | K::ThisType
            | K::OmittedExpression
            | K::SemicolonClassElement
            | K::EmptyStatement
            | K::DebuggerStatement
            | K::MissingDeclaration
            | K::JsxOpeningFragment
            | K::JsxClosingFragment
            | K::JSDocAllType
            | K::JSDocUnknownType => NodeData::None,
            K::QualifiedName | K::JsxNamespacedName => {
                NodeData::QualifiedName(QualifiedNameData {
                    left: NONE,
                    right: NONE,
                })
            }
            K::ComputedPropertyName
            | K::Decorator
            | K::ParenthesizedExpression
            | K::DeleteExpression
            | K::TypeOfExpression
            | K::VoidExpression
            | K::AwaitExpression
            | K::YieldExpression
            | K::SpreadElement
            | K::NonNullExpression
            | K::SpreadAssignment
            | K::JsxSpreadAttribute
            | K::JsxExpression
            | K::ExternalModuleReference
            | K::ExpressionStatement
            | K::ReturnStatement
            | K::ThrowStatement
            | K::ExportAssignment => NodeData::UnaryExprEx(UnaryExprDataEx {
                expression: NONE,
                asterisk_token: false,
            }),
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
            | K::JSDocVariadicType => NodeData::WrappedType(WrappedTypeData { type_node: NONE }),
            K::TypeReference
            | K::TypeQuery
            | K::ExpressionWithTypeArguments
            | K::ImportType
            | K::JSDocNameReference => NodeData::TypeRef(TypeRefData {
                type_name: NONE,
                type_arguments: None,
            }),
            K::TypeOperator => NodeData::TypeOperator(TypeOperatorData {
                operator: TokenKind::KeyOfKeyword,
                type_node: NONE,
            }),
            K::TypeParameter => NodeData::TypeParameter(TypeParameterData {
                name: NONE,
                constraint: NONE,
                default: NONE,
            }),
            K::Parameter => NodeData::Parameter(ParameterData {
                dot_dot_dot_token: false,
                name: NONE,
                question_token: false,
                type_annotation: NONE,
                initializer: NONE,
            }),
            K::PropertySignature | K::PropertyDeclaration => NodeData::Property(PropertyData {
                name: NONE,
                question_token: false,
                type_annotation: NONE,
                initializer: NONE,
            }),
            K::MethodSignature
            | K::MethodDeclaration
            | K::Constructor
            | K::GetAccessor
            | K::SetAccessor
            | K::CallSignature
            | K::ConstructSignature
            | K::IndexSignature
            | K::FunctionType
            | K::ConstructorType
            | K::FunctionExpression
            | K::ArrowFunction
            | K::FunctionDeclaration
            | K::JSDocFunctionType
            | K::JSDocSignature => NodeData::Function(FunctionData {
                name: NONE,
                type_parameters: None,
                parameters: empty_list(),
                type_annotation: NONE,
                body: NONE,
                asterisk_token: false,
            }),
            K::Block | K::ModuleBlock | K::CaseBlock | K::ClassStaticBlockDeclaration => {
                NodeData::Block(BlockData {
                    statements: empty_list(),
                })
            }
            K::SourceFile => NodeData::SourceFile(SourceFileData {
                file_name: String::new(),
                statements: empty_list(),
            }),
            K::ArrayLiteralExpression | K::ObjectLiteralExpression => {
                NodeData::LiteralExpr(LiteralExprData {
                    elements: empty_list(),
                })
            }
            K::ObjectBindingPattern | K::ArrayBindingPattern => {
                NodeData::BindingPattern(BindingPatternData {
                    elements: empty_list(),
                })
            }
            K::UnionType | K::IntersectionType | K::TupleType => {
                NodeData::CompositeType(CompositeTypeData {
                    types: empty_list(),
                })
            }
            K::TypeLiteral | K::JSDocTypeLiteral => NodeData::TypeLiteral(TypeLiteralData {
                members: empty_list(),
            }),
            K::NamedImports | K::NamedExports | K::JsxAttributes => {
                NodeData::NamedImports(NamedImportsData {
                    elements: empty_list(),
                })
            }
            K::CallExpression | K::NewExpression => NodeData::Call(CallExprData {
                expression: NONE,
                type_arguments: None,
                arguments: None,
            }),
            K::TaggedTemplateExpression => NodeData::TaggedTemplate(TaggedTemplateData {
                tag: NONE,
                type_arguments: None,
                template: NONE,
            }),
            K::PropertyAccessExpression | K::ElementAccessExpression => {
                NodeData::Access(AccessExprData {
                    expression: NONE,
                    name_or_argument: NONE,
                    question_dot_token: false,
                })
            }
            K::TypeAssertionExpression | K::AsExpression | K::SatisfiesExpression => {
                NodeData::TypeAssertion(TypeAssertionData {
                    expression: NONE,
                    type_node: NONE,
                })
            }
            K::PrefixUnaryExpression | K::PostfixUnaryExpression => {
                NodeData::UnaryExpr(UnaryExprData {
                    operator: TokenKind::Exclamation,
                    operand: NONE,
                })
            }
            K::BinaryExpression => NodeData::Binary(BinaryExprData {
                left: NONE,
                operator_token: TokenKind::Comma,
                right: NONE,
            }),
            K::ConditionalExpression => NodeData::Conditional(ConditionalExprData {
                condition: NONE,
                when_true: NONE,
                when_false: NONE,
            }),
            K::ConditionalType => NodeData::ConditionalType(ConditionalTypeData {
                check_type: NONE,
                extends_type: NONE,
                true_type: NONE,
                false_type: NONE,
            }),
            K::TemplateExpression | K::TemplateLiteralType => {
                NodeData::Template(TemplateExprData {
                    head: NONE,
                    template_spans: empty_list(),
                })
            }
            K::TemplateSpan | K::TemplateLiteralTypeSpan => {
                NodeData::TemplateSpan(TemplateSpanData {
                    expression: NONE,
                    literal: NONE,
                })
            }
            K::ClassDeclaration | K::ClassExpression => NodeData::Class(ClassData {
                name: NONE,
                type_parameters: None,
                heritage_clauses: None,
                members: empty_list(),
            }),
            K::InterfaceDeclaration => NodeData::Interface(InterfaceData {
                name: NONE,
                type_parameters: None,
                heritage_clauses: None,
                members: empty_list(),
            }),
            K::TypeAliasDeclaration | K::JSDocTypedefTag | K::JSDocCallbackTag => {
                NodeData::TypeAlias(TypeAliasData {
                    name: NONE,
                    type_parameters: None,
                    type_node: NONE,
                })
            }
            K::EnumDeclaration => NodeData::Enum(EnumData {
                name: NONE,
                members: empty_list(),
            }),
            K::EnumMember => NodeData::EnumMember(EnumMemberData {
                name: NONE,
                initializer: NONE,
            }),
            K::ModuleDeclaration => NodeData::Module(ModuleData {
                name: NONE,
                body: NONE,
            }),
            K::VariableStatement => NodeData::VariableStatement(VariableStatementData {
                declaration_list: NONE,
            }),
            K::VariableDeclarationList => NodeData::Variable(VariableData {
                declarations: empty_list(),
            }),
            K::VariableDeclaration => NodeData::VariableDeclaration(VariableDeclarationData {
                name: NONE,
                exclamation_token: false,
                type_annotation: NONE,
                initializer: NONE,
            }),
            K::BindingElement => NodeData::BindingElement(BindingElementData {
                dot_dot_dot_token: false,
                property_name: NONE,
                name: NONE,
                initializer: NONE,
            }),
            K::PropertyAssignment | K::ShorthandPropertyAssignment | K::JsxAttribute => {
                NodeData::PropertyAssignment(PropertyAssignmentData {
                    name: NONE,
                    initializer: NONE,
                })
            }
            K::HeritageClause => NodeData::Heritage(HeritageData {
                token: TokenKind::ExtendsKeyword,
                types: empty_list(),
            }),
            K::ImportDeclaration | K::ExportDeclaration => NodeData::ImportDecl(ImportDeclData {
                import_clause: NONE,
                module_specifier: NONE,
            }),
            K::ImportClause => NodeData::ImportClause(ImportClauseData {
                name: NONE,
                named_bindings: NONE,
            }),
            K::ImportSpecifier | K::ExportSpecifier | K::NamespaceImport | K::NamespaceExport => {
                NodeData::Specifier(SpecifierData {
                    property_name: NONE,
                    name: NONE,
                })
            }
            K::ImportEqualsDeclaration | K::NamespaceExportDeclaration => {
                NodeData::ImportEquals(ImportEqualsData {
                    name: NONE,
                    module_reference: NONE,
                })
            }
            K::IfStatement => NodeData::If(IfStatementData {
                expression: NONE,
                then_statement: NONE,
                else_statement: NONE,
            }),
            K::DoStatement
            | K::WhileStatement
            | K::ForStatement
            | K::ForInStatement
            | K::ForOfStatement
            | K::WithStatement => NodeData::Loop(LoopData {
                initializer: NONE,
                condition: NONE,
                incrementor: NONE,
                statement: NONE,
            }),
            K::ContinueStatement | K::BreakStatement => NodeData::Jump(JumpData { label: NONE }),
            K::LabeledStatement => NodeData::Labeled(LabeledData {
                label: NONE,
                statement: NONE,
            }),
            K::SwitchStatement => NodeData::Switch(SwitchData {
                expression: NONE,
                case_block: NONE,
            }),
            K::CaseClause | K::DefaultClause => NodeData::CaseClause(CaseClauseData {
                expression: NONE,
                statements: empty_list(),
            }),
            K::TryStatement => NodeData::Try(TryData {
                try_block: NONE,
                catch_clause: NONE,
                finally_block: NONE,
            }),
            K::CatchClause => NodeData::CatchClause(CatchClauseData {
                variable_declaration: NONE,
                block: NONE,
            }),
            K::MappedType => NodeData::MappedType(MappedTypeData {
                type_parameter: NONE,
                name_type: NONE,
                type_node: NONE,
                readonly_token: false,
                question_token: false,
            }),
            K::IndexedAccessType => NodeData::IndexedAccessType(IndexedAccessTypeData {
                object_type: NONE,
                index_type: NONE,
            }),
            K::TypePredicate => NodeData::TypePredicate(TypePredicateData {
                asserts: false,
                parameter_name: NONE,
                type_node: NONE,
            }),
            K::NamedTupleMember => NodeData::NamedTupleMember(NamedTupleMemberData {
                dot_dot_dot_token: false,
                name: NONE,
                question_token: false,
                type_node: NONE,
            }),
            K::MetaProperty => NodeData::MetaProperty(MetaPropertyData {
                keyword_token: TokenKind::NewKeyword,
                name: NONE,
            }),
            K::JsxElement | K::JsxFragment => NodeData::JsxElement(JsxElementData {
                opening_element: NONE,
                children: empty_list(),
                closing_element: NONE,
            }),
            K::JsxOpeningElement | K::JsxSelfClosingElement => {
                NodeData::JsxOpening(JsxOpeningData {
                    tag_name: NONE,
                    type_arguments: None,
                    attributes: NONE,
                })
            }
            K::JsxClosingElement => NodeData::JsxClosing(JsxClosingData { tag_name: NONE }),
            K::JSDoc => NodeData::JSDoc(JSDocData {
                comment: String::new(),
                tags: empty_list(),
            }),
            K::JSDocTag
            | K::JSDocAugmentsTag
            | K::JSDocImplementsTag
            | K::JSDocTemplateTag
            | K::JSDocParameterTag
            | K::JSDocReturnTag
            | K::JSDocThisTag
            | K::JSDocTypeTag
            | K::JSDocPropertyTag
            | K::JSDocSatisfiesTag
            | K::JSDocSeeTag
            | K::JSDocDeprecatedTag => NodeData::JSDocTag(JSDocTagData {
                tag_name: NONE,
                name: NONE,
                type_expression: NONE,
                comment: String::new(),
            }),
        }
    }

    /// Direct children, in source order.
    pub fn children(&self) -> SmallVec<[NodeIndex; 8]> {
        let mut out: SmallVec<[NodeIndex; 8]> = SmallVec::new();
        fn push_list(out: &mut SmallVec<[NodeIndex; 8]>, list: &NodeList) {
            out.extend(list.nodes.iter().copied());
        }
        fn push_opt_list(out: &mut SmallVec<[NodeIndex; 8]>, list: &Option<NodeList>) {
            if let Some(list) = list {
                push_list(out, list);
            }
        }
        match self {
            NodeData::None | NodeData::Identifier(_) | NodeData::Literal(_) => {}
            NodeData::QualifiedName(d) => out.extend([d.left, d.right]),
            NodeData::UnaryExprEx(d) => out.push(d.expression),
            NodeData::WrappedType(d) => out.push(d.type_node),
            NodeData::TypeRef(d) => {
                out.push(d.type_name);
                push_opt_list(&mut out, &d.type_arguments);
            }
            NodeData::TypeOperator(d) => out.push(d.type_node),
            NodeData::TypeParameter(d) => out.extend([d.name, d.constraint, d.default]),
            NodeData::Parameter(d) => out.extend([d.name, d.type_annotation, d.initializer]),
            NodeData::Property(d) => out.extend([d.name, d.type_annotation, d.initializer]),
            NodeData::Function(d) => {
                out.push(d.name);
                push_opt_list(&mut out, &d.type_parameters);
                push_list(&mut out, &d.parameters);
                out.extend([d.type_annotation, d.body]);
            }
            NodeData::Block(d) => push_list(&mut out, &d.statements),
            NodeData::SourceFile(d) => push_list(&mut out, &d.statements),
            NodeData::LiteralExpr(d) => push_list(&mut out, &d.elements),
            NodeData::BindingPattern(d) => push_list(&mut out, &d.elements),
            NodeData::CompositeType(d) => push_list(&mut out, &d.types),
            NodeData::TypeLiteral(d) => push_list(&mut out, &d.members),
            NodeData::NamedImports(d) => push_list(&mut out, &d.elements),
            NodeData::Call(d) => {
                out.push(d.expression);
                push_opt_list(&mut out, &d.type_arguments);
                push_opt_list(&mut out, &d.arguments);
            }
            NodeData::TaggedTemplate(d) => {
                out.push(d.tag);
                push_opt_list(&mut out, &d.type_arguments);
                out.push(d.template);
            }
            NodeData::Access(d) => out.extend([d.expression, d.name_or_argument]),
            NodeData::TypeAssertion(d) => out.extend([d.expression, d.type_node]),
            NodeData::UnaryExpr(d) => out.push(d.operand),
            NodeData::Binary(d) => out.extend([d.left, d.right]),
            NodeData::Conditional(d) => out.extend([d.condition, d.when_true, d.when_false]),
            NodeData::ConditionalType(d) => {
                out.extend([d.check_type, d.extends_type, d.true_type, d.false_type])
            }
            NodeData::Template(d) => {
                out.push(d.head);
                push_list(&mut out, &d.template_spans);
            }
            NodeData::TemplateSpan(d) => out.extend([d.expression, d.literal]),
            NodeData::Class(d) => {
                out.push(d.name);
                push_opt_list(&mut out, &d.type_parameters);
                push_opt_list(&mut out, &d.heritage_clauses);
                push_list(&mut out, &d.members);
            }
            NodeData::Interface(d) => {
                out.push(d.name);
                push_opt_list(&mut out, &d.type_parameters);
                push_opt_list(&mut out, &d.heritage_clauses);
                push_list(&mut out, &d.members);
            }
            NodeData::TypeAlias(d) => {
                out.push(d.name);
                push_opt_list(&mut out, &d.type_parameters);
                out.push(d.type_node);
            }
            NodeData::Enum(d) => {
                out.push(d.name);
                push_list(&mut out, &d.members);
            }
            NodeData::EnumMember(d) => out.extend([d.name, d.initializer]),
            NodeData::Module(d) => out.extend([d.name, d.body]),
            NodeData::VariableStatement(d) => out.push(d.declaration_list),
            NodeData::Variable(d) => push_list(&mut out, &d.declarations),
            NodeData::VariableDeclaration(d) => {
                out.extend([d.name, d.type_annotation, d.initializer])
            }
            NodeData::BindingElement(d) => out.extend([d.property_name, d.name, d.initializer]),
            NodeData::PropertyAssignment(d) => out.extend([d.name, d.initializer]),
            NodeData::Heritage(d) => push_list(&mut out, &d.types),
            NodeData::ImportDecl(d) => out.extend([d.import_clause, d.module_specifier]),
            NodeData::ImportClause(d) => out.extend([d.name, d.named_bindings]),
            NodeData::Specifier(d) => out.extend([d.property_name, d.name]),
            NodeData::ImportEquals(d) => out.extend([d.name, d.module_reference]),
            NodeData::If(d) => out.extend([d.expression, d.then_statement, d.else_statement]),
            NodeData::Loop(d) => {
                out.extend([d.initializer, d.condition, d.incrementor, d.statement])
            }
            NodeData::Jump(d) => out.push(d.label),
            NodeData::Labeled(d) => out.extend([d.label, d.statement]),
            NodeData::Switch(d) => out.extend([d.expression, d.case_block]),
            NodeData::CaseClause(d) => {
                out.push(d.expression);
                push_list(&mut out, &d.statements);
            }
            NodeData::Try(d) => out.extend([d.try_block, d.catch_clause, d.finally_block]),
            NodeData::CatchClause(d) => out.extend([d.variable_declaration, d.block]),
            NodeData::MappedType(d) => out.extend([d.type_parameter, d.name_type, d.type_node]),
            NodeData::IndexedAccessType(d) => out.extend([d.object_type, d.index_type]),
            NodeData::TypePredicate(d) => out.extend([d.parameter_name, d.type_node]),
            NodeData::NamedTupleMember(d) => out.extend([d.name, d.type_node]),
            NodeData::MetaProperty(d) => out.push(d.name),
            NodeData::JsxElement(d) => {
                out.push(d.opening_element);
                push_list(&mut out, &d.children);
                out.push(d.closing_element);
            }
            NodeData::JsxOpening(d) => {
                out.push(d.tag_name);
                push_opt_list(&mut out, &d.type_arguments);
                out.push(d.attributes);
            }
            NodeData::JsxClosing(d) => out.push(d.tag_name),
            NodeData::JSDoc(d) => push_list(&mut out, &d.tags),
            NodeData::JSDocTag(d) => out.extend([d.tag_name, d.name, d.type_expression]),
        }
        out.retain(|child| child.is_some());
        out
    }
}
