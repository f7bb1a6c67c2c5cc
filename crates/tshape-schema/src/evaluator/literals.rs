//! Literal tokens, array/object literal shapes and JSX attribute objects.

use super::{SchemaEvaluator, SchemaResult};
use crate::algebra;
use crate::context::SchemaContext;
use crate::schema::{IndexKey, SchemaFlags, SchemaKind, SchemaNode};
use indexmap::IndexMap;
use tshape_ast::node_arena::parse_numeric_literal;
use tshape_ast::{NodeIndex, SyntaxKind};
use tshape_host::{ElementFlags, IntrinsicKind, LiteralValue};
use tshape_resolver::ShapeError;

/// Property key of an object literal member.
pub(crate) enum MemberKey {
    Named(String),
    /// A computed key that did not fold to a literal.
    Computed(SchemaNode),
}

/// Accumulates the members of an object literal or JSX attribute list.
/// Later members and spreads override earlier ones.
#[derive(Default)]
struct ObjectBuilder {
    properties: IndexMap<String, SchemaNode>,
    abstract_index_keys: Vec<IndexKey>,
    /// Spreads of values that are not object-shaped yet.
    opaque: Vec<SchemaNode>,
}

impl ObjectBuilder {
    fn insert(&mut self, key: MemberKey, value: SchemaNode) {
        match key {
            MemberKey::Named(name) => {
                self.properties.shift_remove(&name);
                self.properties.insert(name, value);
            }
            MemberKey::Computed(key) => self.abstract_index_keys.push(IndexKey { key, value }),
        }
    }

    fn spread(&mut self, value: SchemaNode) {
        match value.kind {
            SchemaKind::Object {
                properties,
                abstract_index_keys,
            } => {
                for (name, property) in properties {
                    self.insert(MemberKey::Named(name), property);
                }
                self.abstract_index_keys.extend(abstract_index_keys);
            }
            // Spreading null, undefined or a primitive adds nothing.
            SchemaKind::Primitive { .. } | SchemaKind::Literal { .. } => {}
            _ => self.opaque.push(value),
        }
    }

    fn finish(self) -> SchemaNode {
        let object = SchemaNode::new(SchemaKind::Object {
            properties: self.properties,
            abstract_index_keys: self.abstract_index_keys,
        });
        if self.opaque.is_empty() {
            return object;
        }
        let mut members = self.opaque;
        members.push(object);
        algebra::intersection(members)
    }
}

impl SchemaEvaluator<'_> {
    pub(crate) fn literal(&self, node: NodeIndex) -> SchemaResult {
        let arena = self.arena();
        let Some(n) = arena.get(node) else {
            return Ok(None);
        };
        let text = || arena.get_literal(n).map(|literal| literal.text.as_str());
        let schema = match n.kind {
            SyntaxKind::TrueKeyword => SchemaNode::boolean(true),
            SyntaxKind::FalseKeyword => SchemaNode::boolean(false),
            SyntaxKind::NullKeyword => SchemaNode::primitive(IntrinsicKind::Null),
            SyntaxKind::NumericLiteral => {
                let value = arena
                    .get_literal(n)
                    .and_then(|literal| literal.value.or_else(|| parse_numeric_literal(&literal.text)));
                match value {
                    Some(value) => SchemaNode::number(value),
                    None => SchemaNode::primitive(IntrinsicKind::Number),
                }
            }
            SyntaxKind::BigIntLiteral => match text().and_then(bigint_digits) {
                Some(digits) => SchemaNode::literal(LiteralValue::BigInt(digits)),
                None => SchemaNode::primitive(IntrinsicKind::BigInt),
            },
            SyntaxKind::StringLiteral
            | SyntaxKind::JsxText
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::TemplateMiddle
            | SyntaxKind::TemplateTail => match text() {
                Some(text) => SchemaNode::string(text),
                None => return Err(self.shape_error("literal", node)),
            },
            other => return Err(ShapeError::unexpected("literal", other)),
        };
        Ok(Some(schema))
    }

    /// Array literals evaluate to tuples so that element values survive;
    /// spreads of arrays become rest elements.
    pub(crate) fn array_literal(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let arena = self.arena();
        let Some(literal) = arena.get(node).and_then(|n| arena.get_literal_expr(n)) else {
            return Err(self.shape_error("array literal", node));
        };
        let mut items = Vec::with_capacity(literal.elements.len());
        let mut element_flags = Vec::with_capacity(literal.elements.len());
        for element in literal.elements.iter() {
            if !arena.is_kind(element, SyntaxKind::SpreadElement) {
                items.push(self.descend_or_undefined(element, ctx, "element")?);
                element_flags.push(ElementFlags::REQUIRED);
                continue;
            }
            let Some(spread) = self.descend_into(element, ctx, "spread")? else {
                continue;
            };
            match spread.kind {
                SchemaKind::Tuple {
                    items: spread_items,
                    element_flags: spread_flags,
                } => {
                    items.extend(spread_items);
                    element_flags.extend(spread_flags);
                }
                SchemaKind::Array { .. } => {
                    items.push(spread.with_flags(SchemaFlags::REST));
                    element_flags.push(ElementFlags::REST);
                }
                _ => {
                    let element = algebra::index_access(spread, SchemaNode::primitive(IntrinsicKind::Number));
                    items.push(SchemaNode::array(element).with_flags(SchemaFlags::REST));
                    element_flags.push(ElementFlags::REST);
                }
            }
        }
        Ok(SchemaNode::new(SchemaKind::Tuple {
            items,
            element_flags,
        }))
    }

    pub(crate) fn object_literal(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let arena = self.arena();
        let Some(literal) = arena.get(node).and_then(|n| arena.get_literal_expr(n)) else {
            return Err(self.shape_error("object literal", node));
        };
        let mut builder = ObjectBuilder::default();
        for member in literal.elements.iter() {
            let Some(kind) = arena.kind(member) else {
                continue;
            };
            match kind {
                SyntaxKind::SpreadAssignment => {
                    if let Some(spread) = self.descend_into(member, ctx, "spread")? {
                        builder.spread(spread);
                    }
                }
                SyntaxKind::PropertyAssignment
                | SyntaxKind::ShorthandPropertyAssignment
                | SyntaxKind::MethodDeclaration => {
                    let Some(key) = self.member_key(arena.name_of(member), ctx)? else {
                        continue;
                    };
                    let value = self.descend_or_undefined(member, ctx, "property")?;
                    builder.insert(key, value);
                }
                SyntaxKind::GetAccessor => {
                    let Some(key) = self.member_key(arena.name_of(member), ctx)? else {
                        continue;
                    };
                    let value = self.function_return(member, &ctx.descend("getter"))?;
                    builder.insert(key, value.with_flags(SchemaFlags::READONLY));
                }
                _ => {}
            }
        }
        Ok(builder.finish())
    }

    pub(crate) fn member_key(&self, name: NodeIndex, ctx: &SchemaContext) -> Result<Option<MemberKey>, ShapeError> {
        let arena = self.arena();
        let Some(n) = arena.get(name) else {
            return Ok(None);
        };
        match n.kind {
            SyntaxKind::NumericLiteral => {
                let value = arena
                    .get_literal(n)
                    .and_then(|literal| literal.value.or_else(|| parse_numeric_literal(&literal.text)));
                Ok(value.map(|value| MemberKey::Named(algebra::format_number(value))))
            }
            SyntaxKind::ComputedPropertyName => {
                let Some(key) = self.evaluate_node(name, &ctx.unwrap_into("computed name"))? else {
                    return Ok(None);
                };
                Ok(Some(match key.as_literal() {
                    Some(literal) => MemberKey::Named(algebra::literal_text(literal)),
                    None => MemberKey::Computed(key),
                }))
            }
            _ => Ok(arena.name_text(name).map(|text| MemberKey::Named(text.to_string()))),
        }
    }

    pub(crate) fn property_assignment(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let initializer = self.arena().initializer_of(node);
        self.evaluate_node(initializer, &ctx.unwrap_into("initializer"))
    }

    pub(crate) fn shorthand_property(&self, node: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let name = self.arena().name_of(node);
        if name.is_none() {
            return Ok(None);
        }
        self.reference_value(name, &ctx.unwrap_into("shorthand"))
    }

    // =========================================================================
    // JSX
    // =========================================================================

    /// `name="text"`, `name={expr}`, or bare `name` (which is `true`).
    pub(crate) fn jsx_attribute(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let initializer = self.arena().initializer_of(node);
        if initializer.is_none() {
            return Ok(SchemaNode::boolean(true));
        }
        Ok(self
            .evaluate_node(initializer, &ctx.unwrap_into("attribute"))?
            .unwrap_or_else(|| SchemaNode::primitive(IntrinsicKind::Undefined)))
    }

    /// The props object a JSX attribute list describes.
    pub(crate) fn jsx_attributes(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let arena = self.arena();
        let Some(attributes) = arena.get(node).and_then(|n| arena.get_named_imports(n)) else {
            return Err(self.shape_error("jsx attributes", node));
        };
        let mut builder = ObjectBuilder::default();
        for attribute in attributes.elements.iter() {
            match arena.kind(attribute) {
                Some(SyntaxKind::JsxSpreadAttribute) => {
                    if let Some(spread) = self.descend_into(attribute, ctx, "spread")? {
                        builder.spread(spread);
                    }
                }
                Some(SyntaxKind::JsxAttribute) => {
                    let Some(name) = self.jsx_attribute_name(arena.name_of(attribute)) else {
                        continue;
                    };
                    let value = self
                        .descend_into(attribute, ctx, "attribute")?
                        .unwrap_or_else(|| SchemaNode::boolean(true));
                    builder.insert(MemberKey::Named(name), value);
                }
                _ => {}
            }
        }
        Ok(builder.finish())
    }

    fn jsx_attribute_name(&self, name: NodeIndex) -> Option<String> {
        let arena = self.arena();
        let n = arena.get(name)?;
        if n.kind == SyntaxKind::JsxNamespacedName {
            let qualified = arena.get_qualified_name(n)?;
            let namespace = arena.name_text(qualified.left)?;
            let local = arena.name_text(qualified.right)?;
            return Some(format!("{namespace}:{local}"));
        }
        arena.name_text(name).map(str::to_string)
    }
}

/// Decimal digits of a bigint literal such as `10n` or `0xffn`.
fn bigint_digits(text: &str) -> Option<String> {
    let body = text.strip_suffix('n').unwrap_or(text).replace('_', "");
    if body.is_empty() {
        return None;
    }
    let lower = body.to_ascii_lowercase();
    let (digits, radix) = match lower.get(..2) {
        Some("0x") => (&lower[2..], 16),
        Some("0o") => (&lower[2..], 8),
        Some("0b") => (&lower[2..], 2),
        _ => {
            return lower
                .bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| {
                    let trimmed = lower.trim_start_matches('0');
                    if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() }
                });
        }
    };
    u128::from_str_radix(digits, radix).ok().map(|value| value.to_string())
}
