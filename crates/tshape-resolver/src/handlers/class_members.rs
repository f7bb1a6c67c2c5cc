//! Class and interface members, and the heritage walk.

use crate::classify::{
    enclosing_class, is_inheriting_declaration, is_member_declaration, member_owner,
    type_identity_symbol,
};
use crate::definition::ResolvedDefinition;
use crate::resolver::{DeclarationResolver, ResolveResult};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::trace;
use tshape_ast::NodeIndex;

impl DeclarationResolver<'_> {
    pub(crate) fn member_declaration(&self, node: NodeIndex) -> ResolveResult {
        self.own_symbol(node)
    }

    /// A constructor stands for its class.
    pub(crate) fn constructor(&self, node: NodeIndex) -> ResolveResult {
        let class = self.arena().parent_of(node);
        if class.is_none() {
            return self.direct(node);
        }
        self.own_symbol(class)
    }

    /// A heritage clause resolves as its first named type.
    pub(crate) fn heritage_clause(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(clause) = arena.get(node).and_then(|n| arena.get_heritage(n)) else {
            return Err(self.shape_error("heritage clause", node));
        };
        match clause.types.get(0) {
            Some(first) => self.resolve_inner(first),
            None => self.nothing(),
        }
    }

    /// Nearest ancestor (breadth-first over `extends` and `implements`) that
    /// declares the member `def` points at.
    ///
    /// Applies when `def` points at the access node itself, or at a member of
    /// a class or interface that has heritage clauses.
    pub(crate) fn ancestor_member(
        &self,
        node: NodeIndex,
        def: &ResolvedDefinition,
    ) -> Option<ResolvedDefinition> {
        let arena = self.arena();
        let host = self.host();
        let decl = def.declaration;

        let (name, start) = if decl == node {
            let access = arena.get_access_expr(arena.get(node)?)?;
            (
                arena.name_text(access.name_or_argument)?,
                enclosing_class(arena, node)?,
            )
        } else {
            if !arena.kind(decl).is_some_and(is_member_declaration) {
                return None;
            }
            let owner = member_owner(arena, decl)?;
            if !is_inheriting_declaration(arena, owner) {
                return None;
            }
            (arena.name_text(arena.name_of(decl))?, owner)
        };

        let mut queue = VecDeque::from([start]);
        let mut visited = FxHashSet::default();
        while let Some(owner) = queue.pop_front() {
            if !visited.insert(owner) {
                continue;
            }
            let Some(clauses) = arena.heritage_clauses_of(owner) else {
                continue;
            };
            for clause in clauses.iter() {
                let Some(heritage) = arena.get(clause).and_then(|c| arena.get_heritage(c)) else {
                    continue;
                };
                for base in heritage.types.iter() {
                    let base_type = host.type_at(base);
                    if base_type.is_any_like() {
                        continue;
                    }
                    if let Some(property) = host.property_named(base_type, name) {
                        let found = self.symbol_definition(property, node);
                        if found.has_declaration() && found.declaration != decl {
                            trace!(
                                parent: self.span(),
                                member = name,
                                declaration = found.declaration.0,
                                "member resolved to ancestor declaration"
                            );
                            return Some(found);
                        }
                    }
                    let next = type_identity_symbol(host, base_type)
                        .map(|symbol| self.primary_declaration(symbol))
                        .filter(|next| next.is_some());
                    if let Some(next) = next {
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }
}
