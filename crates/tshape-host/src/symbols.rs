//! Symbol and signature descriptions.

use crate::ids::{SymbolId, TypeId};
use bitflags::bitflags;
use serde::Serialize;
use tshape_ast::NodeIndex;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct SymbolFlags: u32 {
        const VARIABLE = 1 << 0;
        const FUNCTION = 1 << 1;
        const CLASS = 1 << 2;
        const INTERFACE = 1 << 3;
        const TYPE_ALIAS = 1 << 4;
        const ENUM = 1 << 5;
        const ENUM_MEMBER = 1 << 6;
        const PROPERTY = 1 << 7;
        const METHOD = 1 << 8;
        const ACCESSOR = 1 << 9;
        const PARAMETER = 1 << 10;
        const TYPE_PARAMETER = 1 << 11;
        const MODULE = 1 << 12;
        /// Import or re-export; `TypeQuery::alias_target_of` unwraps it.
        const ALIAS = 1 << 13;
        /// Synthesized by the checker (mapped members, spreads, instantiations);
        /// `SymbolInfo::target` links to the originating symbol when there is one.
        const TRANSIENT = 1 << 14;
        const OPTIONAL = 1 << 15;
        const READONLY = 1 << 16;
        /// The `prototype` member of a class constructor
        const PROTOTYPE = 1 << 17;
        const STATIC = 1 << 18;

        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::TYPE_ALIAS.bits()
            | Self::ENUM.bits()
            | Self::TYPE_PARAMETER.bits();
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SymbolInfo {
    pub name: String,
    pub flags: SymbolFlags,
    pub declarations: Vec<NodeIndex>,
    pub value_declaration: NodeIndex,
    /// Containing symbol (class for members, enum for enum members)
    pub parent: Option<SymbolId>,
    /// Originating symbol of a transient symbol
    pub target: Option<SymbolId>,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>, flags: SymbolFlags) -> Self {
        SymbolInfo {
            name: name.into(),
            flags,
            declarations: Vec::new(),
            value_declaration: NodeIndex::NONE,
            parent: None,
            target: None,
        }
    }

    /// Value declaration, or the first declaration when there is none.
    /// Merged declarations resolve to the first one.
    pub fn primary_declaration(&self) -> NodeIndex {
        if self.value_declaration.is_some() {
            return self.value_declaration;
        }
        self.declarations
            .first()
            .copied()
            .unwrap_or(NodeIndex::NONE)
    }

    #[inline]
    pub fn has(&self, flags: SymbolFlags) -> bool {
        self.flags.intersects(flags)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SignatureKind {
    Call,
    Construct,
}

#[derive(Clone, Debug, Serialize)]
pub struct SignatureInfo {
    pub declaration: NodeIndex,
    pub type_parameters: Vec<TypeId>,
    /// Parameter symbols, in order. A rest parameter is last.
    pub parameters: Vec<SymbolId>,
    pub return_type: TypeId,
    pub has_rest: bool,
    pub min_argument_count: usize,
}
