//! String interner for identifier and property-name deduplication.
//!
//! Names are interned once when the tree is built and passed around as `Atom`
//! handles. Comparing two names is then an integer comparison.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names that every program touches. Pre-interning them keeps their atoms stable
/// across arenas, which makes test fixtures easier to read.
const COMMON_STRINGS: &[&str] = &[
    "default",
    "prototype",
    "constructor",
    "length",
    "this",
    "undefined",
    "Array",
    "ReadonlyArray",
    "Promise",
    "__type",
    "__object",
];

/// String interner that deduplicates strings and returns Atom handles.
#[derive(Default, Debug)]
pub struct Interner {
    /// Map from string to atom index
    map: FxHashMap<Arc<str>, Atom>,
    /// Vector of all interned strings (index 0 is empty string)
    strings: Vec<Arc<str>>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        let empty: Arc<str> = Arc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        for s in COMMON_STRINGS {
            interner.intern(s);
        }
        interner
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Look up an already-interned string without inserting it.
    #[inline]
    pub fn lookup(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Unknown atoms resolve to the empty string.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    /// Number of interned strings, including the reserved empty string.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
