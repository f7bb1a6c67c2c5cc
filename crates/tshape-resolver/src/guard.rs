//! Recursion guard for re-entrant resolution.
//!
//! Combines cycle detection (a visiting set) with depth limiting. The resolver
//! and the call-context loader both keep one per session.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    DepthExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }
}

/// Tracks the keys currently being visited and the nesting depth.
///
/// Every successful `enter` must be paired with exactly one `leave`.
#[derive(Debug)]
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    max_depth: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            max_depth,
        }
    }

    pub fn enter(&mut self, key: K) -> RecursionResult {
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.visiting.is_empty()
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            debug_assert!(
                self.visiting.is_empty(),
                "RecursionGuard dropped with {} active entries",
                self.visiting.len()
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/guard_tests.rs"]
mod tests;
