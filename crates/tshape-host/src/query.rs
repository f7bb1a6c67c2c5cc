//! The Type Query Interface.

use crate::ids::{SignatureId, SymbolId, TypeId};
use crate::symbols::{SignatureInfo, SignatureKind, SymbolInfo};
use crate::types::{IndexSignature, TypeData};
use tshape_ast::{NodeArena, NodeIndex};

/// Queries the engines issue against the host type checker.
///
/// Implementations are single-threaded views of one checked program. Ids are
/// only meaningful within the program that issued them.
///
/// Required methods expose the raw tables; the provided methods derive the
/// rest and may be overridden when the host has a faster path.
pub trait TypeQuery {
    /// The syntax tree the node indices point into.
    fn arena(&self) -> &NodeArena;

    fn symbol_at(&self, node: NodeIndex) -> Option<SymbolId>;

    /// Type of `symbol` as seen from `node` (narrowing applies).
    fn type_of_symbol_at(&self, symbol: SymbolId, node: NodeIndex) -> TypeId;

    fn type_at(&self, node: NodeIndex) -> TypeId;

    /// Type imposed on `node` by its position, e.g. the parameter type for an
    /// argument or the property type for an object literal member.
    fn contextual_type_of(&self, node: NodeIndex) -> Option<TypeId>;

    fn resolved_signature_of(&self, call_or_new: NodeIndex) -> Option<SignatureId>;

    /// Unwrap an import or re-export alias. Returns `symbol` itself when it is
    /// not an alias.
    fn alias_target_of(&self, symbol: SymbolId) -> SymbolId;

    fn type_data(&self, ty: TypeId) -> Option<&TypeData>;

    /// Nominal symbol of a type (class, interface, enum, type literal).
    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    /// Type alias the type was written through, if any.
    fn alias_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    fn alias_type_arguments(&self, ty: TypeId) -> &[TypeId];

    fn symbol_info(&self, symbol: SymbolId) -> Option<&SymbolInfo>;

    fn signature_info(&self, signature: SignatureId) -> Option<&SignatureInfo>;

    /// Module symbol for an import/export module specifier.
    fn external_module_symbol(&self, module_specifier: NodeIndex) -> Option<SymbolId>;

    /// Evaluated form of a deferred type (conditional, mapped, reverse-mapped,
    /// `keyof`, indexed access, generic instantiation), if the checker can
    /// produce one.
    fn resolved_structure(&self, ty: TypeId) -> Option<TypeId>;

    fn type_to_display_string(&self, ty: TypeId) -> String;

    fn properties_of(&self, ty: TypeId) -> Vec<SymbolId> {
        match self.type_data(ty) {
            Some(TypeData::Object(shape)) => shape.properties.clone(),
            Some(TypeData::Reference { .. }) => self
                .resolved_structure(ty)
                .filter(|&resolved| resolved != ty)
                .map(|resolved| self.properties_of(resolved))
                .unwrap_or_default(),
            Some(TypeData::Intersection(members)) => {
                let mut out: Vec<SymbolId> = Vec::new();
                for &member in members {
                    for prop in self.properties_of(member) {
                        let name = self.symbol_name(prop);
                        let duplicate = out.iter().any(|&seen| self.symbol_name(seen) == name);
                        if !duplicate {
                            out.push(prop);
                        }
                    }
                }
                out
            }
            _ => Vec::new(),
        }
    }

    /// First property with the given name. Merged declarations under the same
    /// name resolve to the first one.
    fn property_named(&self, ty: TypeId, name: &str) -> Option<SymbolId> {
        self.properties_of(ty)
            .into_iter()
            .find(|&prop| self.symbol_name(prop) == name)
    }

    fn index_signatures_of(&self, ty: TypeId) -> Vec<IndexSignature> {
        match self.type_data(ty) {
            Some(TypeData::Object(shape)) => shape.index_signatures.clone(),
            Some(TypeData::Reference { .. }) => self
                .resolved_structure(ty)
                .filter(|&resolved| resolved != ty)
                .map(|resolved| self.index_signatures_of(resolved))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn signatures_of(&self, ty: TypeId, kind: SignatureKind) -> Vec<SignatureId> {
        match self.type_data(ty) {
            Some(TypeData::Object(shape)) => match kind {
                SignatureKind::Call => shape.call_signatures.clone(),
                SignatureKind::Construct => shape.construct_signatures.clone(),
            },
            _ => Vec::new(),
        }
    }

    fn return_type_of(&self, signature: SignatureId) -> TypeId {
        self.signature_info(signature)
            .map(|info| info.return_type)
            .unwrap_or(TypeId::ERROR)
    }

    fn symbol_name(&self, symbol: SymbolId) -> &str {
        self.symbol_info(symbol)
            .map(|info| info.name.as_str())
            .unwrap_or("")
    }
}
