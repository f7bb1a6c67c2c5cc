//! Node and modifier flags.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Syntactic flags recorded by the parser.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct NodeFlags: u16 {
        /// `let` declaration list
        const LET = 1 << 0;
        /// `const` declaration list
        const CONST = 1 << 1;
        /// Part of an `a?.b` chain
        const OPTIONAL_CHAIN = 1 << 2;
        /// `as const` assertion
        const CONST_ASSERTION = 1 << 3;
        /// `export =` rather than `export default`
        const EXPORT_EQUALS = 1 << 4;
        /// Created by a tool rather than parsed from source
        const SYNTHESIZED = 1 << 5;
        /// Node comes from a JavaScript file (JSDoc annotations are authoritative)
        const JAVASCRIPT_FILE = 1 << 6;
        /// `import type` / `export type`
        const TYPE_ONLY = 1 << 7;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits();
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct ModifierFlags: u16 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const STATIC = 1 << 3;
        const READONLY = 1 << 4;
        const ABSTRACT = 1 << 5;
        const ASYNC = 1 << 6;
        const PUBLIC = 1 << 7;
        const PRIVATE = 1 << 8;
        const PROTECTED = 1 << 9;
        const OVERRIDE = 1 << 10;
        const CONST = 1 << 11;
    }
}
