use crate::resolver::{DeclarationResolver, ResolveResult};
use tshape_ast::NodeIndex;

impl DeclarationResolver<'_> {
    /// Typed JSDoc tags resolve as their type expression.
    pub(crate) fn jsdoc_tag(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(tag) = arena.get(node).and_then(|n| arena.get_jsdoc_tag(n)) else {
            return Err(self.shape_error("jsdoc tag", node));
        };
        if tag.type_expression.is_none() {
            return self.nothing();
        }
        self.resolve_inner(tag.type_expression)
    }
}
