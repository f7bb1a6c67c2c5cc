//! Common types and utilities for the tshape crates.
//!
//! This crate provides foundational types used across all tshape crates:
//! - String interning (`Atom`, `Interner`)
//! - Analysis limits and thresholds
//! - Line/column positions for diagnostics

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};
