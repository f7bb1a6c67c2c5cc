//! JSX elements and attributes.

use crate::definition::Resolution;
use crate::resolver::{DeclarationResolver, ResolveResult};
use tshape_ast::{NodeData, NodeIndex};

impl DeclarationResolver<'_> {
    pub(crate) fn jsx_element(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(element) = arena.get(node).and_then(|n| arena.get_jsx_element(n)) else {
            return Err(self.shape_error("jsx element", node));
        };
        if element.opening_element.is_none() {
            return self.nothing();
        }
        self.resolve_inner(element.opening_element)
    }

    /// Opening, closing and self-closing tags resolve as their tag name.
    pub(crate) fn jsx_tag(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let tag_name = match arena.get(node).map(|n| &n.data) {
            Some(NodeData::JsxOpening(opening)) => opening.tag_name,
            Some(NodeData::JsxClosing(closing)) => closing.tag_name,
            _ => return Err(self.shape_error("jsx tag", node)),
        };
        if tag_name.is_none() {
            return Ok(None);
        }
        self.resolve_inner(tag_name)
    }

    /// An attribute resolves to the matching prop of the element's attribute
    /// type, then to its value.
    pub(crate) fn jsx_attribute(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let host = self.host();
        let Some(attribute) = arena.get(node).and_then(|n| arena.get_property_assignment(n))
        else {
            return Err(self.shape_error("jsx attribute", node));
        };
        let attributes = arena.parent_of(node);
        let prop = host
            .contextual_type_of(attributes)
            .filter(|ty| !ty.is_any_like())
            .zip(arena.name_text(attribute.name))
            .and_then(|(ty, name)| host.property_named(ty, name));
        if let Some(prop) = prop {
            return Ok(Some(Resolution::Resolved(self.symbol_definition(prop, node))));
        }
        if attribute.initializer.is_some() {
            return self.resolve_inner(attribute.initializer);
        }
        self.direct(node)
    }
}
