//! Node kinds and operator tokens.
//!
//! `SyntaxKind` is closed: every consumer dispatches over it with an exhaustive
//! `match`, so adding a kind is a compile error until every table handles it.

use serde::Serialize;
use std::fmt;

macro_rules! syntax_kinds {
    ($($(#[$doc:meta])* $group:ident { $($name:ident),* $(,)? })*) => {
        /// Kind tag of an AST node.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($($name,)*)*
        }

        impl SyntaxKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [SyntaxKind] = &[$($(SyntaxKind::$name,)*)*];

            /// The variant name, used in diagnostics.
            pub fn name(self) -> &'static str {
                match self {
                    $($(SyntaxKind::$name => stringify!($name),)*)*
                }
            }
        }
    };
}

syntax_kinds! {
    Literals {
        NumericLiteral,
        BigIntLiteral,
        StringLiteral,
        JsxText,
        RegularExpressionLiteral,
        NoSubstitutionTemplateLiteral,
        TemplateHead,
        TemplateMiddle,
        TemplateTail,
    }
    Identifiers {
        Identifier,
        PrivateIdentifier,
    }
    KeywordExpressions {
        TrueKeyword,
        FalseKeyword,
        NullKeyword,
        ThisKeyword,
        SuperKeyword,
        ImportKeyword,
    }
    TypeKeywords {
        AnyKeyword,
        UnknownKeyword,
        NeverKeyword,
        VoidKeyword,
        UndefinedKeyword,
        BooleanKeyword,
        NumberKeyword,
        StringKeyword,
        BigIntKeyword,
        SymbolKeyword,
        ObjectKeyword,
        IntrinsicKeyword,
    }
    Names {
        QualifiedName,
        ComputedPropertyName,
    }
    SignatureElements {
        TypeParameter,
        Parameter,
        Decorator,
    }
    TypeMembers {
        PropertySignature,
        PropertyDeclaration,
        MethodSignature,
        MethodDeclaration,
        ClassStaticBlockDeclaration,
        Constructor,
        GetAccessor,
        SetAccessor,
        CallSignature,
        ConstructSignature,
        IndexSignature,
    }
    Types {
        TypePredicate,
        TypeReference,
        FunctionType,
        ConstructorType,
        TypeQuery,
        TypeLiteral,
        ArrayType,
        TupleType,
        OptionalType,
        RestType,
        UnionType,
        IntersectionType,
        ConditionalType,
        InferType,
        ParenthesizedType,
        ThisType,
        TypeOperator,
        IndexedAccessType,
        MappedType,
        LiteralType,
        NamedTupleMember,
        TemplateLiteralType,
        TemplateLiteralTypeSpan,
        ImportType,
    }
    BindingPatterns {
        ObjectBindingPattern,
        ArrayBindingPattern,
        BindingElement,
    }
    Expressions {
        ArrayLiteralExpression,
        ObjectLiteralExpression,
        PropertyAccessExpression,
        ElementAccessExpression,
        CallExpression,
        NewExpression,
        TaggedTemplateExpression,
        TypeAssertionExpression,
        ParenthesizedExpression,
        FunctionExpression,
        ArrowFunction,
        DeleteExpression,
        TypeOfExpression,
        VoidExpression,
        AwaitExpression,
        PrefixUnaryExpression,
        PostfixUnaryExpression,
        BinaryExpression,
        ConditionalExpression,
        TemplateExpression,
        YieldExpression,
        SpreadElement,
        ClassExpression,
        OmittedExpression,
        ExpressionWithTypeArguments,
        AsExpression,
        NonNullExpression,
        MetaProperty,
        SatisfiesExpression,
    }
    Misc {
        TemplateSpan,
        SemicolonClassElement,
    }
    Statements {
        Block,
        EmptyStatement,
        VariableStatement,
        ExpressionStatement,
        IfStatement,
        DoStatement,
        WhileStatement,
        ForStatement,
        ForInStatement,
        ForOfStatement,
        ContinueStatement,
        BreakStatement,
        ReturnStatement,
        WithStatement,
        SwitchStatement,
        LabeledStatement,
        ThrowStatement,
        TryStatement,
        DebuggerStatement,
    }
    Declarations {
        VariableDeclaration,
        VariableDeclarationList,
        FunctionDeclaration,
        ClassDeclaration,
        InterfaceDeclaration,
        TypeAliasDeclaration,
        EnumDeclaration,
        ModuleDeclaration,
        ModuleBlock,
        CaseBlock,
        NamespaceExportDeclaration,
        ImportEqualsDeclaration,
        ImportDeclaration,
        ImportClause,
        NamespaceImport,
        NamedImports,
        ImportSpecifier,
        ExportAssignment,
        ExportDeclaration,
        NamedExports,
        NamespaceExport,
        ExportSpecifier,
        MissingDeclaration,
        ExternalModuleReference,
    }
    Jsx {
        JsxElement,
        JsxSelfClosingElement,
        JsxOpeningElement,
        JsxClosingElement,
        JsxFragment,
        JsxOpeningFragment,
        JsxClosingFragment,
        JsxAttribute,
        JsxAttributes,
        JsxSpreadAttribute,
        JsxExpression,
        JsxNamespacedName,
    }
    Clauses {
        CaseClause,
        DefaultClause,
        HeritageClause,
        CatchClause,
    }
    PropertyAssignments {
        PropertyAssignment,
        ShorthandPropertyAssignment,
        SpreadAssignment,
    }
    Enums {
        EnumMember,
    }
    TopLevel {
        SourceFile,
    }
    JsDoc {
        JSDocTypeExpression,
        JSDocNameReference,
        JSDocAllType,
        JSDocUnknownType,
        JSDocNullableType,
        JSDocNonNullableType,
        JSDocOptionalType,
        JSDocFunctionType,
        JSDocVariadicType,
        JSDoc,
        JSDocTypeLiteral,
        JSDocSignature,
        JSDocTag,
        JSDocAugmentsTag,
        JSDocImplementsTag,
        JSDocTemplateTag,
        JSDocTypedefTag,
        JSDocCallbackTag,
        JSDocParameterTag,
        JSDocReturnTag,
        JSDocThisTag,
        JSDocTypeTag,
        JSDocPropertyTag,
        JSDocSatisfiesTag,
        JSDocSeeTag,
        JSDocDeprecatedTag,
    }
}

impl SyntaxKind {
    /// Source text of keyword-like kinds that carry no payload.
    pub fn keyword_text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::NullKeyword => "null",
            SyntaxKind::ThisKeyword | SyntaxKind::ThisType => "this",
            SyntaxKind::SuperKeyword => "super",
            SyntaxKind::ImportKeyword => "import",
            SyntaxKind::AnyKeyword => "any",
            SyntaxKind::UnknownKeyword => "unknown",
            SyntaxKind::NeverKeyword => "never",
            SyntaxKind::VoidKeyword => "void",
            SyntaxKind::UndefinedKeyword => "undefined",
            SyntaxKind::BooleanKeyword => "boolean",
            SyntaxKind::NumberKeyword => "number",
            SyntaxKind::StringKeyword => "string",
            SyntaxKind::BigIntKeyword => "bigint",
            SyntaxKind::SymbolKeyword => "symbol",
            SyntaxKind::ObjectKeyword => "object",
            SyntaxKind::IntrinsicKeyword => "intrinsic",
            SyntaxKind::OmittedExpression => "",
            SyntaxKind::SemicolonClassElement | SyntaxKind::EmptyStatement => ";",
            SyntaxKind::DebuggerStatement => "debugger",
            SyntaxKind::JsxOpeningFragment => "<>",
            SyntaxKind::JsxClosingFragment => "</>",
            SyntaxKind::JSDocAllType => "*",
            SyntaxKind::JSDocUnknownType => "?",
            _ => return None,
        })
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::JsxText
                | SyntaxKind::RegularExpressionLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateHead
                | SyntaxKind::TemplateMiddle
                | SyntaxKind::TemplateTail
        )
    }

    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::MethodSignature
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::CallSignature
                | SyntaxKind::ConstructSignature
                | SyntaxKind::IndexSignature
                | SyntaxKind::FunctionType
                | SyntaxKind::ConstructorType
                | SyntaxKind::JSDocFunctionType
                | SyntaxKind::JSDocSignature
        )
    }

    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression
        )
    }

    pub fn is_binding_pattern(self) -> bool {
        matches!(
            self,
            SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator and keyword tokens stored inside node payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Plus,
    Minus,
    Asterisk,
    AsteriskAsterisk,
    Slash,
    Percent,
    LessThanLessThan,
    GreaterThanGreaterThan,
    GreaterThanGreaterThanGreaterThan,
    Ampersand,
    Bar,
    Caret,
    AmpersandAmpersand,
    BarBar,
    QuestionQuestion,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    EqualsEquals,
    EqualsEqualsEquals,
    ExclamationEquals,
    ExclamationEqualsEquals,
    Equals,
    PlusEquals,
    MinusEquals,
    AsteriskEquals,
    SlashEquals,
    PercentEquals,
    AmpersandAmpersandEquals,
    BarBarEquals,
    QuestionQuestionEquals,
    Comma,
    Exclamation,
    Tilde,
    PlusPlus,
    MinusMinus,
    InKeyword,
    InstanceOfKeyword,
    KeyOfKeyword,
    UniqueKeyword,
    ReadonlyKeyword,
    ExtendsKeyword,
    ImplementsKeyword,
    NewKeyword,
    ImportKeyword,
}

impl TokenKind {
    pub fn text(self) -> &'static str {
        match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::AsteriskAsterisk => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::LessThanLessThan => "<<",
            TokenKind::GreaterThanGreaterThan => ">>",
            TokenKind::GreaterThanGreaterThanGreaterThan => ">>>",
            TokenKind::Ampersand => "&",
            TokenKind::Bar => "|",
            TokenKind::Caret => "^",
            TokenKind::AmpersandAmpersand => "&&",
            TokenKind::BarBar => "||",
            TokenKind::QuestionQuestion => "??",
            TokenKind::LessThan => "<",
            TokenKind::LessThanEquals => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanEquals => ">=",
            TokenKind::EqualsEquals => "==",
            TokenKind::EqualsEqualsEquals => "===",
            TokenKind::ExclamationEquals => "!=",
            TokenKind::ExclamationEqualsEquals => "!==",
            TokenKind::Equals => "=",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::AsteriskEquals => "*=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::AmpersandAmpersandEquals => "&&=",
            TokenKind::BarBarEquals => "||=",
            TokenKind::QuestionQuestionEquals => "??=",
            TokenKind::Comma => ",",
            TokenKind::Exclamation => "!",
            TokenKind::Tilde => "~",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::InKeyword => "in",
            TokenKind::InstanceOfKeyword => "instanceof",
            TokenKind::KeyOfKeyword => "keyof",
            TokenKind::UniqueKeyword => "unique",
            TokenKind::ReadonlyKeyword => "readonly",
            TokenKind::ExtendsKeyword => "extends",
            TokenKind::ImplementsKeyword => "implements",
            TokenKind::NewKeyword => "new",
            TokenKind::ImportKeyword => "import",
        }
    }

    /// `=` and the compound assignment operators.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::AsteriskEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
                | TokenKind::AmpersandAmpersandEquals
                | TokenKind::BarBarEquals
                | TokenKind::QuestionQuestionEquals
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
