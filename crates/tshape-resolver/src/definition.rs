//! Resolved definitions and resolver options.

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use tshape_ast::NodeIndex;
use tshape_host::{SymbolId, TypeId, TypeQuery};

/// Where the type of a resolved definition comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeSource {
    Known(TypeId),
    /// `TypeQuery::type_at` of the node.
    OfNode(NodeIndex),
    /// `TypeQuery::type_of_symbol_at`.
    OfSymbolAt(SymbolId, NodeIndex),
    /// Contextual type of the node, falling back to its own type.
    Contextual(NodeIndex),
}

/// A type queried from the host at most once.
///
/// Most callers only need the identity of a definition, so the type query is
/// deferred until `get` is called.
#[derive(Clone, Debug)]
pub struct LazyType {
    source: TypeSource,
    cell: OnceCell<TypeId>,
}

impl LazyType {
    pub fn new(source: TypeSource) -> Self {
        LazyType {
            source,
            cell: OnceCell::new(),
        }
    }

    pub fn known(ty: TypeId) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(ty);
        LazyType {
            source: TypeSource::Known(ty),
            cell,
        }
    }

    pub fn of_node(node: NodeIndex) -> Self {
        Self::new(TypeSource::OfNode(node))
    }

    pub fn of_symbol_at(symbol: SymbolId, node: NodeIndex) -> Self {
        Self::new(TypeSource::OfSymbolAt(symbol, node))
    }

    pub fn contextual(node: NodeIndex) -> Self {
        Self::new(TypeSource::Contextual(node))
    }

    pub fn source(&self) -> TypeSource {
        self.source
    }

    /// The type, if it was already computed.
    pub fn peek(&self) -> Option<TypeId> {
        self.cell.get().copied()
    }

    pub fn get(&self, host: &dyn TypeQuery) -> TypeId {
        *self.cell.get_or_init(|| match self.source {
            TypeSource::Known(ty) => ty,
            TypeSource::OfNode(node) => host.type_at(node),
            TypeSource::OfSymbolAt(symbol, node) => host.type_of_symbol_at(symbol, node),
            TypeSource::Contextual(node) => host
                .contextual_type_of(node)
                .unwrap_or_else(|| host.type_at(node)),
        })
    }
}

/// What a node ultimately refers to.
///
/// `declaration` is `NodeIndex::NONE` only for declaration-less symbols
/// (intrinsics, synthesized members) and for type-only results without a
/// symbol.
#[derive(Clone, Debug)]
pub struct ResolvedDefinition {
    pub symbol: Option<SymbolId>,
    pub declaration: NodeIndex,
    pub ty: LazyType,
}

impl ResolvedDefinition {
    pub fn new(symbol: Option<SymbolId>, declaration: NodeIndex, ty: LazyType) -> Self {
        ResolvedDefinition {
            symbol,
            declaration,
            ty,
        }
    }

    /// A result that only carries a type.
    pub fn type_only(ty: LazyType) -> Self {
        Self::new(None, NodeIndex::NONE, ty)
    }

    #[inline]
    pub fn has_declaration(&self) -> bool {
        self.declaration.is_some()
    }

    pub fn type_id(&self, host: &dyn TypeQuery) -> TypeId {
        self.ty.get(host)
    }

    /// Same symbol and declaration. The type is not compared.
    pub fn same_target(&self, other: &ResolvedDefinition) -> bool {
        self.symbol == other.symbol && self.declaration == other.declaration
    }
}

/// Outcome of a successful resolution.
#[derive(Clone, Debug)]
pub enum Resolution {
    Resolved(ResolvedDefinition),
    /// The node deliberately refers to nothing: `return;`, `yield`, an omitted
    /// array element, a statement without a value.
    Nothing,
}

impl Resolution {
    pub fn definition(&self) -> Option<&ResolvedDefinition> {
        match self {
            Resolution::Resolved(def) => Some(def),
            Resolution::Nothing => None,
        }
    }

    pub fn into_definition(self) -> Option<ResolvedDefinition> {
        match self {
            Resolution::Resolved(def) => Some(def),
            Resolution::Nothing => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Keep the local binding instead of following aliases to their target.
    pub choose_local: bool,
}
