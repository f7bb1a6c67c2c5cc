//! Host type model.
//!
//! A closed description of what a host type looks like. Deferred type algebra
//! (conditional, mapped, generic `keyof` and indexed access) is not evaluated
//! here; the host exposes the evaluated form through
//! `TypeQuery::resolved_structure`.

use crate::ids::{SignatureId, SymbolId, TypeId};
use bitflags::bitflags;
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    BigInt,
    Symbol,
    Object,
}

/// `f64` with total equality, so literal types can be hashed and interned.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(transparent)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralValue {
    String(String),
    Number(OrderedFloat),
    /// Decimal digits without the `n` suffix
    BigInt(String),
    Boolean(bool),
}

impl LiteralValue {
    pub fn number(value: f64) -> Self {
        LiteralValue::Number(OrderedFloat(value))
    }

    /// The primitive this literal widens to.
    pub fn widened(&self) -> IntrinsicKind {
        match self {
            LiteralValue::String(_) => IntrinsicKind::String,
            LiteralValue::Number(_) => IntrinsicKind::Number,
            LiteralValue::BigInt(_) => IntrinsicKind::BigInt,
            LiteralValue::Boolean(_) => IntrinsicKind::Boolean,
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct ObjectFlags: u16 {
        /// Instance side of a class
        const CLASS = 1 << 0;
        const INTERFACE = 1 << 1;
        /// Type literal or object literal without a nominal name
        const ANONYMOUS = 1 << 2;
        const OBJECT_LITERAL = 1 << 3;
        /// Static side of a class (`typeof C`)
        const CLASS_CONSTRUCTOR = 1 << 4;
        /// Namespace object of a module or namespace
        const MODULE_NAMESPACE = 1 << 5;
        /// Produced by evaluating a mapped or reverse-mapped type
        const MAPPED = 1 << 6;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct IndexSignature {
    pub key_type: TypeId,
    pub value_type: TypeId,
    pub readonly: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectShape {
    /// Own and inherited properties, in declaration order
    pub properties: Vec<SymbolId>,
    pub call_signatures: Vec<SignatureId>,
    pub construct_signatures: Vec<SignatureId>,
    pub index_signatures: Vec<IndexSignature>,
    pub flags: ObjectFlags,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct ElementFlags: u8 {
        const REQUIRED = 1 << 0;
        const OPTIONAL = 1 << 1;
        const REST = 1 << 2;
        const VARIADIC = 1 << 3;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TupleElement {
    pub type_id: TypeId,
    pub flags: ElementFlags,
    pub name: Option<String>,
}

impl TupleElement {
    pub fn required(type_id: TypeId) -> Self {
        TupleElement {
            type_id,
            flags: ElementFlags::REQUIRED,
            name: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateSpan {
    Text(String),
    Type(TypeId),
}

/// Structure of a host type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    UniqueSymbol(SymbolId),
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Object(ObjectShape),
    Array(TypeId),
    Tuple(Vec<TupleElement>),
    /// Instantiation of a generic declaration, e.g. `Box<string>`.
    Reference {
        target: TypeId,
        type_arguments: Vec<TypeId>,
    },
    TypeParameter {
        name: String,
        constraint: Option<TypeId>,
    },
    /// `keyof T`
    Index(TypeId),
    /// `T[K]`
    IndexAccess {
        object: TypeId,
        index: TypeId,
    },
    Conditional {
        check_type: TypeId,
        extends_type: TypeId,
    },
    Mapped {
        constraint: TypeId,
        template: TypeId,
    },
    TemplateLiteral(Vec<TemplateSpan>),
    Error,
}

impl TypeData {
    pub fn intrinsic_of(ty: TypeId) -> Option<TypeData> {
        let kind = match ty {
            TypeId::ERROR => return Some(TypeData::Error),
            TypeId::NEVER => IntrinsicKind::Never,
            TypeId::UNKNOWN => IntrinsicKind::Unknown,
            TypeId::ANY => IntrinsicKind::Any,
            TypeId::VOID => IntrinsicKind::Void,
            TypeId::UNDEFINED => IntrinsicKind::Undefined,
            TypeId::NULL => IntrinsicKind::Null,
            TypeId::BOOLEAN => IntrinsicKind::Boolean,
            TypeId::NUMBER => IntrinsicKind::Number,
            TypeId::STRING => IntrinsicKind::String,
            TypeId::BIGINT => IntrinsicKind::BigInt,
            TypeId::SYMBOL => IntrinsicKind::Symbol,
            TypeId::OBJECT => IntrinsicKind::Object,
            TypeId::BOOLEAN_TRUE => return Some(TypeData::Literal(LiteralValue::Boolean(true))),
            TypeId::BOOLEAN_FALSE => return Some(TypeData::Literal(LiteralValue::Boolean(false))),
            _ => return None,
        };
        Some(TypeData::Intrinsic(kind))
    }
}
