//! Schema node model.
//!
//! A `SchemaNode` is the serializable, printer-facing description of a value or
//! type. It is a closed tagged union (`SchemaKind`) plus a small header: the
//! originating node (used when re-binding parameters), flags, and the symbol it
//! was produced for.
//!
//! `Reference` is the only variant that may be circular. Every cycle in an
//! evaluated schema passes through a reference into the definitions table.

use bitflags::bitflags;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use tshape_ast::{NodeIndex, TokenKind};
use tshape_host::{ElementFlags, IntrinsicKind, LiteralValue, SymbolId, TypeId};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct SchemaFlags: u8 {
        const OPTIONAL = 1 << 0;
        const READONLY = 1 << 1;
        /// Depends on a parameter that has no binding yet; `node` is the
        /// parameter declaration.
        const UNBOUND_PARAMETER = 1 << 2;
        /// Rest parameter or spread tuple element
        const REST = 1 << 3;
    }
}

/// Key of the definitions table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefinitionKey {
    Type(TypeId),
    /// The depth-exhaustion sentinel.
    RecursionLimit,
}

impl fmt::Display for DefinitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionKey::Type(ty) => write!(f, "{ty}"),
            DefinitionKey::RecursionLimit => f.write_str(RECURSION_LIMIT_NAME),
        }
    }
}

// Serialized as a string so the key can be a JSON object key.
impl Serialize for DefinitionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const RECURSION_LIMIT_NAME: &str = "TooMuchRecursion";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexKey {
    pub key: SchemaNode,
    pub value: SchemaNode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionParameter {
    pub name: String,
    pub schema: SchemaNode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplatePart {
    Text(String),
    Schema(SchemaNode),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SchemaKind {
    Primitive {
        primitive: IntrinsicKind,
    },
    Literal {
        value: LiteralValue,
    },
    Union {
        items: Vec<SchemaNode>,
    },
    Intersection {
        items: Vec<SchemaNode>,
    },
    #[serde(rename_all = "camelCase")]
    Object {
        properties: IndexMap<String, SchemaNode>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        abstract_index_keys: Vec<IndexKey>,
    },
    Array {
        items: Box<SchemaNode>,
    },
    #[serde(rename_all = "camelCase")]
    Tuple {
        items: Vec<SchemaNode>,
        element_flags: Vec<ElementFlags>,
    },
    #[serde(rename_all = "camelCase")]
    Function {
        parameters: Vec<FunctionParameter>,
        return_type: Box<SchemaNode>,
    },
    TemplateLiteral {
        parts: Vec<TemplatePart>,
    },
    /// An operator whose operands could not be folded yet.
    BinaryExpression {
        operator: TokenKind,
        left: Box<SchemaNode>,
        right: Box<SchemaNode>,
    },
    /// `keyof target`
    Index {
        target: Box<SchemaNode>,
    },
    IndexAccess {
        object: Box<SchemaNode>,
        index: Box<SchemaNode>,
    },
    #[serde(rename_all = "camelCase")]
    Reference {
        name: String,
        key: DefinitionKey,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        type_arguments: Vec<SchemaNode>,
    },
    Error {
        message: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaNode {
    #[serde(flatten)]
    pub kind: SchemaKind,
    #[serde(skip_serializing_if = "is_absent")]
    pub node: NodeIndex,
    #[serde(skip_serializing_if = "SchemaFlags::is_empty")]
    pub flags: SchemaFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
}

fn is_absent(node: &NodeIndex) -> bool {
    node.is_none()
}

impl From<SchemaKind> for SchemaNode {
    fn from(kind: SchemaKind) -> Self {
        SchemaNode::new(kind)
    }
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        SchemaNode {
            kind,
            node: NodeIndex::NONE,
            flags: SchemaFlags::empty(),
            symbol: None,
        }
    }

    pub fn primitive(primitive: IntrinsicKind) -> Self {
        SchemaNode::new(SchemaKind::Primitive { primitive })
    }

    pub fn literal(value: LiteralValue) -> Self {
        SchemaNode::new(SchemaKind::Literal { value })
    }

    pub fn string(value: impl Into<String>) -> Self {
        SchemaNode::literal(LiteralValue::String(value.into()))
    }

    pub fn number(value: f64) -> Self {
        SchemaNode::literal(LiteralValue::number(value))
    }

    pub fn boolean(value: bool) -> Self {
        SchemaNode::literal(LiteralValue::Boolean(value))
    }

    pub fn never() -> Self {
        SchemaNode::primitive(IntrinsicKind::Never)
    }

    pub fn unknown() -> Self {
        SchemaNode::primitive(IntrinsicKind::Unknown)
    }

    pub fn error(message: impl Into<String>) -> Self {
        SchemaNode::new(SchemaKind::Error {
            message: message.into(),
        })
    }

    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::new(SchemaKind::Array {
            items: Box::new(items),
        })
    }

    pub fn object(properties: IndexMap<String, SchemaNode>) -> Self {
        SchemaNode::new(SchemaKind::Object {
            properties,
            abstract_index_keys: Vec::new(),
        })
    }

    pub fn reference(name: impl Into<String>, key: DefinitionKey, type_arguments: Vec<SchemaNode>) -> Self {
        SchemaNode::new(SchemaKind::Reference {
            name: name.into(),
            key,
            type_arguments,
        })
    }

    /// Reference emitted when the depth budget runs out.
    pub fn recursion_limit() -> Self {
        SchemaNode::reference(RECURSION_LIMIT_NAME, DefinitionKey::RecursionLimit, Vec::new())
    }

    /// `unknown`, standing for the value of a parameter that has no binding.
    pub fn unbound_parameter(parameter: NodeIndex) -> Self {
        SchemaNode::unknown()
            .with_node(parameter)
            .with_flags(SchemaFlags::UNBOUND_PARAMETER)
    }

    #[must_use]
    pub fn with_node(mut self, node: NodeIndex) -> Self {
        self.node = node;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SchemaFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: Option<SymbolId>) -> Self {
        self.symbol = symbol;
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    pub fn is_primitive(&self, primitive: IntrinsicKind) -> bool {
        matches!(&self.kind, SchemaKind::Primitive { primitive: p } if *p == primitive)
    }

    #[inline]
    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match &self.kind {
            SchemaKind::Literal { value } => Some(value),
            _ => None,
        }
    }

    pub fn reference_key(&self) -> Option<DefinitionKey> {
        match &self.kind {
            SchemaKind::Reference { key, .. } => Some(*key),
            _ => None,
        }
    }

    #[inline]
    pub fn is_unbound(&self) -> bool {
        self.flags.contains(SchemaFlags::UNBOUND_PARAMETER)
    }

    pub fn is_nullish(&self) -> bool {
        self.is_primitive(IntrinsicKind::Null)
            || self.is_primitive(IntrinsicKind::Undefined)
            || self.is_primitive(IntrinsicKind::Void)
    }

    /// No `index`, `index-access`, `error`, unfolded operator or unbound leaf
    /// anywhere below this node. References are not followed.
    pub fn is_concrete(&self) -> bool {
        if self.is_unbound() {
            return false;
        }
        match &self.kind {
            SchemaKind::Index { .. }
            | SchemaKind::IndexAccess { .. }
            | SchemaKind::Error { .. }
            | SchemaKind::BinaryExpression { .. } => false,
            _ => self.children().iter().all(|child| child.is_concrete()),
        }
    }

    pub fn has_unbound(&self) -> bool {
        self.is_unbound() || self.children().iter().any(|child| child.has_unbound())
    }

    /// Parameter declarations this schema still depends on, in first-seen order.
    pub fn unbound_parameters(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        self.visit(&mut |node| {
            if node.is_unbound() && !out.contains(&node.node) {
                out.push(node.node);
            }
        });
        out
    }

    /// Number of leaves that stay open until more is known: unbound
    /// parameters and index accesses.
    pub fn open_leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |node| {
            if node.is_unbound() || matches!(node.kind, SchemaKind::IndexAccess { .. }) {
                count += 1;
            }
        });
        count
    }

    /// Every reference occurrence below (and including) this node.
    pub fn references(&self) -> Vec<DefinitionKey> {
        let mut out = Vec::new();
        self.visit(&mut |node| {
            if let Some(key) = node.reference_key() {
                out.push(key);
            }
        });
        out
    }

    pub fn mentions(&self, key: DefinitionKey) -> bool {
        self.reference_key() == Some(key) || self.children().iter().any(|child| child.mentions(key))
    }

    /// Static truthiness, when every value the schema admits agrees.
    pub fn truthiness(&self) -> Option<bool> {
        match &self.kind {
            SchemaKind::Literal { value } => Some(match value {
                LiteralValue::String(s) => !s.is_empty(),
                LiteralValue::Number(n) => n.0 != 0.0 && !n.0.is_nan(),
                LiteralValue::BigInt(digits) => !digits.trim_start_matches('0').is_empty(),
                LiteralValue::Boolean(b) => *b,
            }),
            SchemaKind::Primitive { primitive } => match primitive {
                IntrinsicKind::Null | IntrinsicKind::Undefined | IntrinsicKind::Void => {
                    Some(false)
                }
                IntrinsicKind::Object | IntrinsicKind::Symbol => Some(true),
                _ => None,
            },
            SchemaKind::Object { .. }
            | SchemaKind::Array { .. }
            | SchemaKind::Tuple { .. }
            | SchemaKind::Function { .. } => Some(true),
            SchemaKind::Union { items } => {
                let first = items.first()?.truthiness()?;
                items
                    .iter()
                    .all(|item| item.truthiness() == Some(first))
                    .then_some(first)
            }
            _ => None,
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    pub fn children(&self) -> SmallVec<[&SchemaNode; 4]> {
        let mut out: SmallVec<[&SchemaNode; 4]> = SmallVec::new();
        match &self.kind {
            SchemaKind::Primitive { .. } | SchemaKind::Literal { .. } | SchemaKind::Error { .. } => {}
            SchemaKind::Union { items }
            | SchemaKind::Intersection { items }
            | SchemaKind::Tuple { items, .. } => out.extend(items.iter()),
            SchemaKind::Reference { type_arguments, .. } => out.extend(type_arguments.iter()),
            SchemaKind::Object {
                properties,
                abstract_index_keys,
            } => {
                out.extend(properties.values());
                for index_key in abstract_index_keys {
                    out.push(&index_key.key);
                    out.push(&index_key.value);
                }
            }
            SchemaKind::Array { items } => out.push(&**items),
            SchemaKind::Function {
                parameters,
                return_type,
            } => {
                out.extend(parameters.iter().map(|p| &p.schema));
                out.push(&**return_type);
            }
            SchemaKind::TemplateLiteral { parts } => {
                out.extend(parts.iter().filter_map(|part| match part {
                    TemplatePart::Schema(schema) => Some(schema),
                    TemplatePart::Text(_) => None,
                }));
            }
            SchemaKind::BinaryExpression { left, right, .. } => {
                out.push(&**left);
                out.push(&**right);
            }
            SchemaKind::Index { target } => out.push(&**target),
            SchemaKind::IndexAccess { object, index } => {
                out.push(&**object);
                out.push(&**index);
            }
        }
        out
    }

    pub fn children_mut(&mut self) -> SmallVec<[&mut SchemaNode; 4]> {
        let mut out: SmallVec<[&mut SchemaNode; 4]> = SmallVec::new();
        match &mut self.kind {
            SchemaKind::Primitive { .. } | SchemaKind::Literal { .. } | SchemaKind::Error { .. } => {}
            SchemaKind::Union { items }
            | SchemaKind::Intersection { items }
            | SchemaKind::Tuple { items, .. } => out.extend(items.iter_mut()),
            SchemaKind::Reference { type_arguments, .. } => out.extend(type_arguments.iter_mut()),
            SchemaKind::Object {
                properties,
                abstract_index_keys,
            } => {
                out.extend(properties.values_mut());
                for index_key in abstract_index_keys.iter_mut() {
                    out.push(&mut index_key.key);
                    out.push(&mut index_key.value);
                }
            }
            SchemaKind::Array { items } => out.push(&mut **items),
            SchemaKind::Function {
                parameters,
                return_type,
            } => {
                out.extend(parameters.iter_mut().map(|p| &mut p.schema));
                out.push(&mut **return_type);
            }
            SchemaKind::TemplateLiteral { parts } => {
                out.extend(parts.iter_mut().filter_map(|part| match part {
                    TemplatePart::Schema(schema) => Some(schema),
                    TemplatePart::Text(_) => None,
                }));
            }
            SchemaKind::BinaryExpression { left, right, .. } => {
                out.push(&mut **left);
                out.push(&mut **right);
            }
            SchemaKind::Index { target } => out.push(&mut **target),
            SchemaKind::IndexAccess { object, index } => {
                out.push(&mut **object);
                out.push(&mut **index);
            }
        }
        out
    }

    /// Pre-order walk.
    pub fn visit(&self, f: &mut impl FnMut(&SchemaNode)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Replace the first reference to `key`, in pre-order, with `body`.
    /// The flags of the replaced reference are kept on the inlined body.
    pub fn inline_reference(&mut self, key: DefinitionKey, body: &SchemaNode) -> bool {
        if self.reference_key() == Some(key) {
            let flags = self.flags;
            let node = self.node;
            *self = body.clone().with_flags(flags);
            if self.node.is_none() {
                self.node = node;
            }
            return true;
        }
        self.children_mut()
            .into_iter()
            .any(|child| child.inline_reference(key, body))
    }
}

#[cfg(test)]
#[path = "../tests/schema_tests.rs"]
mod tests;
