//! Property access, object literal members and destructuring.

use crate::classify::{indexed_element_type, is_trackable, type_identity_symbol};
use crate::definition::{LazyType, Resolution, ResolvedDefinition};
use crate::resolver::{DeclarationResolver, ResolveResult};
use tshape_ast::{NodeIndex, SyntaxKind};
use tshape_host::TypeId;

impl DeclarationResolver<'_> {
    /// Direct lookup of the access, then the heritage walk for members that
    /// may be declared upstream.
    pub(crate) fn property_access(&self, node: NodeIndex) -> ResolveResult {
        let def = match self.direct(node)? {
            Some(Resolution::Resolved(def)) if def.symbol.is_some() => def,
            Some(Resolution::Resolved(def)) => match self.member_of_object(node) {
                Some(member) => member,
                None => return Ok(Some(Resolution::Resolved(def))),
            },
            Some(Resolution::Nothing) => return self.nothing(),
            None => match self.member_of_object(node) {
                Some(member) => member,
                None => return Ok(None),
            },
        };
        let def = self.follow(def)?;
        if let Some(ancestor) = self.ancestor_member(node, &def) {
            return Ok(Some(Resolution::Resolved(ancestor)));
        }
        Ok(Some(Resolution::Resolved(def)))
    }

    /// Property of the accessed object's type named by the access.
    fn member_of_object(&self, node: NodeIndex) -> Option<ResolvedDefinition> {
        let arena = self.arena();
        let access = arena.get_access_expr(arena.get(node)?)?;
        let name = arena.name_text(access.name_or_argument)?;
        let object_type = self.host().type_at(access.expression);
        if object_type.is_any_like() {
            return None;
        }
        let property = self.host().property_named(object_type, name)?;
        Some(self.symbol_definition(property, node))
    }

    /// Members of an object literal (and shorthand members) resolve to the
    /// matching property of the literal's contextual type.
    pub(crate) fn property_assignment(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(assignment) = arena.get(node).and_then(|n| arena.get_property_assignment(n))
        else {
            return Err(self.shape_error("property assignment", node));
        };
        let object = arena.parent_of(node);
        if let Some(name) = arena.name_text(assignment.name) {
            let contextual = self
                .host()
                .contextual_type_of(object)
                .filter(|ty| !ty.is_any_like());
            if let Some(property) = contextual.and_then(|ty| self.host().property_named(ty, name))
            {
                let def = self.symbol_definition(property, node);
                if def.has_declaration() {
                    return Ok(Some(Resolution::Resolved(def)));
                }
            }
        }
        if arena.is_kind(node, SyntaxKind::ShorthandPropertyAssignment) {
            return self.direct_followed(assignment.name);
        }
        if assignment.initializer.is_some() {
            return self.resolve_inner(assignment.initializer);
        }
        self.direct(node)
    }

    /// A binding pattern resolves as the value it destructures.
    pub(crate) fn binding_pattern(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let parent = arena.parent_of(node);
        match arena.kind(parent) {
            Some(SyntaxKind::VariableDeclaration | SyntaxKind::Parameter) => {
                let annotation = arena.type_annotation_of(parent);
                if annotation.is_some() {
                    if let Some(def) = self.resolve_declared(annotation)? {
                        return Ok(Some(Resolution::Resolved(def)));
                    }
                }
                let initializer = arena.initializer_of(parent);
                if initializer.is_some() {
                    return self.resolve_inner(initializer);
                }
                self.direct(node)
            }
            Some(SyntaxKind::BindingElement) => self.resolve_inner(parent),
            _ => self.direct(node),
        }
    }

    /// A destructured name resolves to the property (or element) of the
    /// destructured type it binds. Rest elements and unresolvable sources use
    /// the direct lookup; an `any` member keeps the binding itself.
    pub(crate) fn binding_element(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(element) = arena.get(node).and_then(|n| arena.get_binding_element(n)) else {
            return Err(self.shape_error("binding element", node));
        };
        if element.dot_dot_dot_token {
            return self.direct(node);
        }
        let pattern = arena.parent_of(node);
        let Some(source) = self.pattern_source_type(pattern) else {
            return self.direct(node);
        };
        let host = self.host();
        match arena.kind(pattern) {
            Some(SyntaxKind::ArrayBindingPattern) => {
                let Some(index) = arena
                    .get(pattern)
                    .and_then(|p| arena.get_binding_pattern(p))
                    .and_then(|p| p.elements.position(node))
                else {
                    return self.direct(node);
                };
                match indexed_element_type(host, source, index) {
                    Some(TypeId::ANY) => self.binding_itself(node, TypeId::ANY),
                    Some(element_type) => {
                        match type_identity_symbol(host, element_type)
                            .filter(|&symbol| is_trackable(host, symbol))
                        {
                            Some(symbol) => Ok(Some(Resolution::Resolved(ResolvedDefinition::new(
                                Some(symbol),
                                self.primary_declaration(symbol),
                                LazyType::known(element_type),
                            )))),
                            None => self.binding_itself(node, element_type),
                        }
                    }
                    None => self.direct(node),
                }
            }
            _ => {
                let key = if element.property_name.is_some() {
                    element.property_name
                } else {
                    element.name
                };
                let Some(name) = arena.name_text(key) else {
                    return self.direct(node);
                };
                match host.property_named(source, name) {
                    Some(property) => {
                        if host.type_of_symbol_at(property, node) == TypeId::ANY {
                            self.binding_itself(node, TypeId::ANY)
                        } else {
                            Ok(Some(Resolution::Resolved(
                                self.symbol_definition(property, node),
                            )))
                        }
                    }
                    None => self.direct(node),
                }
            }
        }
    }

    /// Type of the value a pattern destructures.
    pub(crate) fn pattern_source_type(&self, pattern: NodeIndex) -> Option<TypeId> {
        let arena = self.arena();
        let host = self.host();
        let parent = arena.parent_of(pattern);
        let ty = match arena.kind(parent)? {
            SyntaxKind::VariableDeclaration | SyntaxKind::Parameter => {
                let annotation = arena.type_annotation_of(parent);
                let initializer = arena.initializer_of(parent);
                if annotation.is_some() {
                    host.type_at(annotation)
                } else if initializer.is_some() {
                    host.type_at(initializer)
                } else {
                    host.type_at(parent)
                }
            }
            SyntaxKind::BindingElement => self.binding_element_type(parent)?,
            _ => host.type_at(pattern),
        };
        (!matches!(ty, TypeId::NONE | TypeId::ERROR)).then_some(ty)
    }

    /// Type bound by a (possibly nested) binding element.
    fn binding_element_type(&self, element: NodeIndex) -> Option<TypeId> {
        let arena = self.arena();
        let host = self.host();
        let data = arena.get_binding_element(arena.get(element)?)?;
        let pattern = arena.parent_of(element);
        let source = self.pattern_source_type(pattern)?;
        if arena.is_kind(pattern, SyntaxKind::ArrayBindingPattern) {
            let index = arena
                .get_binding_pattern(arena.get(pattern)?)?
                .elements
                .position(element)?;
            return indexed_element_type(host, source, index);
        }
        let key = if data.property_name.is_some() {
            data.property_name
        } else {
            data.name
        };
        let property = host.property_named(source, arena.name_text(key)?)?;
        Some(host.type_of_symbol_at(property, element))
    }

    /// The binding element as its own declaration.
    fn binding_itself(&self, node: NodeIndex, ty: TypeId) -> ResolveResult {
        Ok(Some(Resolution::Resolved(ResolvedDefinition::new(
            self.symbol_at(node),
            node,
            LazyType::known(ty),
        ))))
    }
}
