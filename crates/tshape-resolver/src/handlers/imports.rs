//! Module syntax: imports, exports and `import x = require(...)`.

use crate::definition::Resolution;
use crate::resolver::{DeclarationResolver, ResolveResult};
use tracing::{debug, warn};
use tshape_ast::{NodeIndex, SyntaxKind};
use tshape_host::SymbolId;

impl DeclarationResolver<'_> {
    /// Import and export declarations resolve to the module they name.
    pub(crate) fn module_declaration(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(decl) = arena.get(node).and_then(|n| arena.get_import_decl(n)) else {
            return Err(self.shape_error("import or export declaration", node));
        };
        if decl.module_specifier.is_none() {
            return self.nothing();
        }
        match self.host().external_module_symbol(decl.module_specifier) {
            Some(module) => Ok(Some(Resolution::Resolved(
                self.symbol_definition(module, node),
            ))),
            None => {
                warn!(
                    parent: self.span(),
                    specifier = arena.node_text(decl.module_specifier),
                    "unresolved module"
                );
                self.direct(node)
            }
        }
    }

    pub(crate) fn import_clause(&self, node: NodeIndex) -> ResolveResult {
        if self.arena().name_of(node).is_none() {
            return self.nothing();
        }
        self.default_import(node)
    }

    /// The `default` export of the imported module, followed to its
    /// declaration.
    pub(crate) fn default_import(&self, clause: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let host = self.host();
        let name = arena.name_of(clause);
        let Some(module) = self.module_of(clause) else {
            warn!(parent: self.span(), node = clause.0, "default import of an unresolved module");
            return self.direct(name);
        };
        let module_type = host.type_of_symbol_at(module, clause);
        match host.property_named(module_type, "default") {
            Some(export) => {
                let def = self.symbol_definition(export, name);
                Ok(Some(Resolution::Resolved(self.follow(def)?)))
            }
            None => {
                debug!(parent: self.span(), module = %module, "module has no default export");
                self.direct(name)
            }
        }
    }

    /// `* as ns` resolves to the module itself.
    pub(crate) fn namespace_import(&self, node: NodeIndex) -> ResolveResult {
        match self.module_of(node) {
            Some(module) => Ok(Some(Resolution::Resolved(
                self.symbol_definition(module, node),
            ))),
            None => {
                warn!(
                    parent: self.span(),
                    node = node.0,
                    "namespace import of an unresolved module"
                );
                self.own_symbol(node)
            }
        }
    }

    /// Import and export specifiers resolve to the exported member, followed
    /// through re-exports.
    pub(crate) fn specifier(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let host = self.host();
        let Some(specifier) = arena.get(node).and_then(|n| arena.get_specifier(n)) else {
            return Err(self.shape_error("import or export specifier", node));
        };
        let imported = if specifier.property_name.is_some() {
            specifier.property_name
        } else {
            specifier.name
        };
        if imported.is_none() {
            return self.direct(node);
        }

        if !self.has_module_specifier(node) {
            // `export { local }` names a local binding.
            return self.direct_followed(imported);
        }

        let Some(module) = self.module_of(node) else {
            warn!(parent: self.span(), node = node.0, "specifier of an unresolved module");
            return self.direct_followed(specifier.name);
        };
        let module_type = host.type_of_symbol_at(module, node);
        let export = arena
            .name_text(imported)
            .and_then(|name| host.property_named(module_type, name));
        match export {
            Some(export) => {
                let def = self.symbol_definition(export, node);
                Ok(Some(Resolution::Resolved(self.follow(def)?)))
            }
            None => self.direct_followed(specifier.name),
        }
    }

    /// `import x = require("m")` resolves to the module; `import x = A.B`
    /// resolves the entity name.
    pub(crate) fn import_equals(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(import) = arena.get(node).and_then(|n| arena.get_import_equals(n)) else {
            return Err(self.shape_error("import equals declaration", node));
        };
        if import.module_reference.is_none() {
            return self.own_symbol(node);
        }
        if arena.is_kind(import.module_reference, SyntaxKind::ExternalModuleReference) {
            return self.external_module_reference(import.module_reference);
        }
        match self.resolve_inner(import.module_reference)? {
            Some(found) => Ok(Some(found)),
            None => self.own_symbol(node),
        }
    }

    pub(crate) fn external_module_reference(&self, node: NodeIndex) -> ResolveResult {
        let arena = self.arena();
        let Some(reference) = arena.get(node).and_then(|n| arena.get_unary_expr_ex(n)) else {
            return Err(self.shape_error("external module reference", node));
        };
        let module = reference
            .expression
            .into_option()
            .and_then(|specifier| self.host().external_module_symbol(specifier));
        match module {
            Some(module) => Ok(Some(Resolution::Resolved(
                self.symbol_definition(module, node),
            ))),
            None => {
                warn!(parent: self.span(), node = node.0, "unresolved external module reference");
                self.direct(node)
            }
        }
    }

    /// Module symbol named by the import or export declaration enclosing `node`.
    fn module_of(&self, node: NodeIndex) -> Option<SymbolId> {
        let arena = self.arena();
        let decl = self.enclosing_module_declaration(node)?;
        let specifier = arena.get_import_decl(arena.get(decl)?)?.module_specifier;
        specifier
            .into_option()
            .and_then(|specifier| self.host().external_module_symbol(specifier))
    }

    fn has_module_specifier(&self, node: NodeIndex) -> bool {
        let arena = self.arena();
        self.enclosing_module_declaration(node)
            .and_then(|decl| arena.get(decl))
            .and_then(|decl| arena.get_import_decl(decl))
            .is_some_and(|decl| decl.module_specifier.is_some())
    }

    fn enclosing_module_declaration(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.arena().find_ancestor(node, |n| {
            matches!(
                n.kind,
                SyntaxKind::ImportDeclaration | SyntaxKind::ExportDeclaration
            )
        })
    }
}
