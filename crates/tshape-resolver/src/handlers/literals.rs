//! Literals and template fragments.

use crate::classify::is_declaration_name;
use crate::definition::Resolution;
use crate::resolver::{DeclarationResolver, ResolveResult};
use tshape_ast::{NodeIndex, SyntaxKind};

impl DeclarationResolver<'_> {
    /// Literal values carry their own type and name no declaration, except in
    /// name, element-access and module-specifier positions.
    pub(crate) fn literal(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let parent = arena.parent_of(node);
        let Some(parent_node) = arena.get(parent) else {
            return self.type_only(node);
        };
        match parent_node.kind {
            SyntaxKind::PropertyAssignment if arena.name_of(parent) == node => Ok(None),
            SyntaxKind::ElementAccessExpression => {
                let is_argument = arena
                    .get_access_expr(parent_node)
                    .is_some_and(|access| access.name_or_argument == node);
                if is_argument {
                    self.resolve_inner(parent)
                } else {
                    self.type_only(node)
                }
            }
            SyntaxKind::ImportDeclaration
            | SyntaxKind::ExportDeclaration
            | SyntaxKind::ExternalModuleReference => self.module_specifier(node),
            _ if is_declaration_name(arena, node) => match self.resolve_declared(parent)? {
                Some(def) => Ok(Some(Resolution::Resolved(def))),
                None => self.type_only(node),
            },
            _ => self.type_only(node),
        }
    }

    /// Module symbol named by a module specifier string.
    fn module_specifier(&self, node: NodeIndex) -> ResolveResult {
        match self.host().external_module_symbol(node) {
            Some(module) => Ok(Some(Resolution::Resolved(
                self.symbol_definition(module, node),
            ))),
            None => {
                tracing::warn!(
                    parent: self.span(),
                    specifier = self.arena().node_text(node),
                    "unresolved module specifier"
                );
                self.type_only(node)
            }
        }
    }

    /// Template heads, middles and tails resolve as the template they belong to.
    pub(crate) fn template_part(&self, node: NodeIndex) -> ResolveResult {
        let template = self.arena().find_ancestor(node, |n| {
            matches!(
                n.kind,
                SyntaxKind::TemplateExpression | SyntaxKind::TemplateLiteralType
            )
        });
        match template {
            Some(template) => self.resolve_inner(template),
            None => self.type_only(node),
        }
    }
}
