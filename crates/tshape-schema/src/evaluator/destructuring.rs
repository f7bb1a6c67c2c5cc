//! Binding patterns and binding elements.
//!
//! A binding element's value is a member of the value its pattern
//! destructures. That value comes from the pattern's parent: a variable's
//! initializer or annotation, a parameter, or an enclosing binding element.

use super::literals::MemberKey;
use super::{SchemaEvaluator, SchemaResult};
use crate::algebra;
use crate::context::SchemaContext;
use crate::schema::{SchemaKind, SchemaNode};
use tshape_ast::{NodeIndex, SyntaxKind};
use tshape_host::IntrinsicKind;
use tshape_resolver::ShapeError;

impl SchemaEvaluator<'_> {
    /// The value a binding pattern destructures. `None` when the pattern is
    /// not attached to anything that provides one.
    pub(crate) fn binding_pattern_source(&self, pattern: NodeIndex, ctx: &SchemaContext) -> SchemaResult {
        let arena = self.arena();
        let parent = arena.parent_of(pattern);
        match arena.kind(parent) {
            Some(SyntaxKind::VariableDeclaration) => {
                let annotation = arena.type_annotation_of(parent);
                if annotation.is_some() {
                    return self.annotation_type(annotation, ctx).map(Some);
                }
                let initializer = arena.initializer_of(parent);
                if initializer.is_some() {
                    return self.guarded_declaration(parent, pattern, ctx, |ctx| {
                        self.evaluate_node(initializer, ctx)
                    });
                }
                self.node_type(parent, ctx)
            }
            Some(SyntaxKind::Parameter) => self.parameter_value(parent, ctx).map(Some),
            Some(SyntaxKind::BindingElement) => self.binding_element(parent, ctx).map(Some),
            Some(_) => self.node_type(pattern, ctx),
            None => Ok(None),
        }
    }

    pub(crate) fn binding_element(
        &self,
        node: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        let arena = self.arena();
        let Some(element) = arena.get(node).and_then(|n| arena.get_binding_element(n)) else {
            return Err(self.shape_error("binding element", node));
        };
        let pattern = arena.parent_of(node);
        let Some(pattern_kind) = arena.kind(pattern).filter(|kind| kind.is_binding_pattern()) else {
            return Err(ShapeError::InvariantViolation(
                "binding element outside a binding pattern".to_string(),
            ));
        };
        let Some(source) = self.binding_pattern_source(pattern, &ctx.unwrap_into("pattern"))? else {
            return Err(ShapeError::InvariantViolation(
                "binding pattern has no value to destructure".to_string(),
            ));
        };

        let value = if pattern_kind == SyntaxKind::ObjectBindingPattern {
            if element.dot_dot_dot_token {
                self.object_rest(pattern, source)
            } else {
                let key_node = if element.property_name.is_some() {
                    element.property_name
                } else {
                    element.name
                };
                match self.member_key(key_node, ctx)? {
                    Some(MemberKey::Named(name)) => {
                        Some(algebra::index_access(source, SchemaNode::string(name)))
                    }
                    Some(MemberKey::Computed(key)) => Some(algebra::index_access(source, key)),
                    None => None,
                }
            }
        } else {
            let position = arena
                .get(pattern)
                .and_then(|p| arena.get_binding_pattern(p))
                .and_then(|p| p.elements.position(node))
                .unwrap_or(0);
            if element.dot_dot_dot_token {
                tuple_rest(source, position)
            } else {
                Some(algebra::index_access(source, SchemaNode::number(position as f64)))
            }
        };

        let value = match value {
            Some(value) if !is_stuck(&value) => value,
            _ => self.evaluate_type(self.host.type_at(node), ctx)?,
        };
        self.apply_default(value, element.initializer, ctx)
    }

    /// `{ a, ...rest }`: the source object without the named siblings.
    fn object_rest(&self, pattern: NodeIndex, source: SchemaNode) -> Option<SchemaNode> {
        let arena = self.arena();
        let SchemaKind::Object {
            mut properties,
            abstract_index_keys,
        } = source.kind
        else {
            return None;
        };
        let siblings = arena.get(pattern).and_then(|p| arena.get_binding_pattern(p))?;
        for sibling in siblings.elements.iter() {
            let Some(data) = arena.get(sibling).and_then(|s| arena.get_binding_element(s)) else {
                continue;
            };
            if data.dot_dot_dot_token {
                continue;
            }
            let key_node = if data.property_name.is_some() {
                data.property_name
            } else {
                data.name
            };
            if let Some(name) = arena.name_text(key_node) {
                properties.shift_remove(name);
            }
        }
        Some(SchemaNode::new(SchemaKind::Object {
            properties,
            abstract_index_keys,
        }))
    }

    /// A default initializer applies where the destructured value is
    /// `undefined`.
    fn apply_default(
        &self,
        value: SchemaNode,
        initializer: NodeIndex,
        ctx: &SchemaContext,
    ) -> Result<SchemaNode, ShapeError> {
        if initializer.is_none() {
            return Ok(value);
        }
        if value.is_primitive(IntrinsicKind::Undefined) {
            return self.descend_or_undefined(initializer, ctx, "default");
        }
        let SchemaKind::Union { items } = &value.kind else {
            return Ok(value);
        };
        if !items.iter().any(|item| item.is_primitive(IntrinsicKind::Undefined)) {
            return Ok(value);
        }
        let defined: Vec<SchemaNode> = items
            .iter()
            .filter(|item| !item.is_primitive(IntrinsicKind::Undefined))
            .cloned()
            .collect();
        let default = self.descend_or_undefined(initializer, ctx, "default")?;
        Ok(algebra::union(defined.into_iter().chain([default])))
    }
}

/// `[a, ...rest]`: the elements from `position` on.
fn tuple_rest(source: SchemaNode, position: usize) -> Option<SchemaNode> {
    match source.kind {
        SchemaKind::Tuple {
            items,
            element_flags,
        } => Some(SchemaNode::new(SchemaKind::Tuple {
            items: items.into_iter().skip(position).collect(),
            element_flags: element_flags.into_iter().skip(position).collect(),
        })),
        SchemaKind::Array { .. } => Some(source),
        _ => None,
    }
}

/// An access into a known value that found no member in schema form.
fn is_stuck(value: &SchemaNode) -> bool {
    match &value.kind {
        SchemaKind::IndexAccess { object, index } => object.is_concrete() && index.is_concrete(),
        _ => false,
    }
}
