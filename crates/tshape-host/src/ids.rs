//! Opaque handles handed out by the host.

use serde::Serialize;
use std::fmt;

/// Handle to a host type.
///
/// Ids below `FIRST_USER` are the intrinsic types; every host reserves them
/// with the same meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// No type.
    pub const NONE: TypeId = TypeId(0);
    /// Error type; printed as `any`.
    pub const ERROR: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const UNKNOWN: TypeId = TypeId(3);
    pub const ANY: TypeId = TypeId(4);
    pub const VOID: TypeId = TypeId(5);
    pub const UNDEFINED: TypeId = TypeId(6);
    pub const NULL: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const NUMBER: TypeId = TypeId(9);
    pub const STRING: TypeId = TypeId(10);
    pub const BIGINT: TypeId = TypeId(11);
    pub const SYMBOL: TypeId = TypeId(12);
    /// The non-primitive `object` type.
    pub const OBJECT: TypeId = TypeId(13);
    pub const BOOLEAN_TRUE: TypeId = TypeId(14);
    pub const BOOLEAN_FALSE: TypeId = TypeId(15);

    /// First id available for host-defined types.
    pub const FIRST_USER: u32 = 100;

    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    /// `any`, `error` or no type at all: nothing useful to follow.
    #[inline]
    pub fn is_any_like(self) -> bool {
        matches!(self, TypeId::NONE | TypeId::ERROR | TypeId::ANY)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Handle to a host symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Handle to a host call or construct signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SignatureId(pub u32);
