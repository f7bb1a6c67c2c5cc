//! Centralized limits and thresholds for declaration resolution and schema
//! evaluation.
//!
//! Every recursive walk in the resolver and the schema evaluator is bounded by
//! one of these constants. Removing a bound turns a slow pathological input
//! (deeply generic or mutually recursive types) into a non-terminating one.
//!
//! # Categories
//!
//! - **Recursion Depths**: structural descent budgets
//! - **Operation Counts**: caps on expansion and deferred work

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Default structural depth budget for schema evaluation.
///
/// Decremented on every structural descent (object property, array element,
/// function parameter/return, binary operand). Parentheses, `as`-casts and
/// statement wrappers do not consume budget. When the budget reaches zero the
/// evaluator emits the "too much recursion" reference instead of descending.
///
/// # TypeScript example
///
/// ```typescript
/// type Deep<T> = { next: Deep<Deep<T>> };
/// // every level instantiates a fresh type; the budget stops the descent
/// ```
pub const DEFAULT_SCHEMA_DEPTH: u32 = 24;

/// Maximum re-entrant depth of the declaration resolver.
///
/// Resolution recurses through parents, patterns, initializers and the
/// follower's single hop. Cycles are caught by the node-keyed guard; this
/// bound catches long acyclic chains such as `const a = b; const b = c; ...`.
pub const MAX_RESOLVE_DEPTH: u32 = 64;

/// Maximum number of nested inline call evaluations.
///
/// Inline evaluation of a callee body may itself contain calls. The
/// `symbols_handled` stack prevents re-entering the same function; this bound
/// keeps long chains of distinct helpers from exhausting the stack.
pub const MAX_INLINE_CALL_DEPTH: u32 = 16;

// =============================================================================
// Operation Count Limits
// =============================================================================

/// Maximum number of strings produced by template literal expansion.
///
/// ```typescript
/// type A = `${'a' | 'b'}-${'x' | 'y'}`; // 4 strings, expanded
/// type Huge = `${Digit}${Digit}${Digit}${Digit}${Digit}`; // 100k strings, kept opaque
/// ```
///
/// When the cartesian product would exceed this limit the embedded unions are
/// kept as opaque template segments instead.
pub const TEMPLATE_LITERAL_EXPANSION_LIMIT: usize = 1_000;

/// Maximum number of deferred (thunked) named definitions resolved by the
/// post-pass of one evaluation.
///
/// Each deferred definition can register further deferred definitions when it
/// runs out of depth budget. Past this cap the remaining entries are replaced
/// by the recursion sentinel.
pub const MAX_DEFERRED_DEFINITIONS: usize = 256;

/// Maximum number of excerpt characters kept in a node-scoped error.
pub const ERROR_EXCERPT_CHARS: usize = 80;

/// Maximum number of argument variants produced when the arguments of one
/// call are rebound through the call sites of the enclosing function.
///
/// ```typescript
/// function outer(n) { return inner(n); } // every call of `outer` yields
/// outer(1); outer(2);                     // one variant of `inner`'s call
/// ```
pub const MAX_CALL_VARIANTS: usize = 64;
