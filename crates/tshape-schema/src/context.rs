//! Schema evaluation context.
//!
//! A `SchemaContext` is a cheap, immutable per-branch value: remaining depth,
//! parameter bindings, the evaluation history and the session span. Every
//! context produced from the same root shares one `SharedTables` instance
//! holding the whole-evaluation state (type cache, definitions table, call
//! guards), so sibling branches see each other's memoized results while
//! bindings stay private to the branch that created them.

use crate::options::SchemaOptions;
use crate::schema::{DefinitionKey, SchemaNode};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{Span, debug_span};
use tshape_ast::NodeIndex;
use tshape_common::limits::MAX_RESOLVE_DEPTH;
use tshape_host::{SymbolId, TypeId};
use tshape_resolver::{RecursionGuard, RecursionResult};

/// State of one named type in the definitions table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefinitionCell {
    /// Registered when the depth budget ran out; resolved by the post-pass.
    NotStarted { ty: TypeId },
    /// Its structural schema is being computed further up the stack.
    Building,
    Done(SchemaNode),
}

/// Whole-evaluation state shared by every context of one session.
#[derive(Debug)]
pub struct SharedTables {
    type_cache: RefCell<FxHashMap<TypeId, SchemaNode>>,
    definitions: RefCell<IndexMap<DefinitionKey, DefinitionCell>>,
    /// Functions whose body or call sites are being evaluated.
    symbols_handled: RefCell<Vec<SymbolId>>,
    /// Anonymous types being converted; a repeat is a structural cycle.
    types_handled: RefCell<RecursionGuard<TypeId>>,
    /// Declarations whose initializer is being propagated.
    declarations_visiting: RefCell<RecursionGuard<NodeIndex>>,
    inline_depth: Cell<u32>,
}

impl SharedTables {
    fn new() -> Self {
        SharedTables {
            type_cache: RefCell::new(FxHashMap::default()),
            definitions: RefCell::new(IndexMap::new()),
            symbols_handled: RefCell::new(Vec::new()),
            types_handled: RefCell::new(RecursionGuard::new(MAX_RESOLVE_DEPTH)),
            declarations_visiting: RefCell::new(RecursionGuard::new(MAX_RESOLVE_DEPTH)),
            inline_depth: Cell::new(0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SchemaContext {
    shared: Rc<SharedTables>,
    bindings: Rc<FxHashMap<NodeIndex, SchemaNode>>,
    history: String,
    depth: u32,
    options: SchemaOptions,
    span: Span,
}

impl SchemaContext {
    /// Root context of a new evaluation session.
    pub fn new(options: SchemaOptions) -> Self {
        let span = debug_span!(
            "schema_evaluation",
            max_depth = options.max_depth,
            late_bind = options.late_bind_parameters
        );
        SchemaContext::with_span(options, span)
    }

    pub fn with_span(options: SchemaOptions, span: Span) -> Self {
        SchemaContext {
            shared: Rc::new(SharedTables::new()),
            bindings: Rc::new(FxHashMap::default()),
            history: String::new(),
            depth: options.max_depth,
            options,
            span,
        }
    }

    /// Child context for a structural descent: one less unit of depth.
    pub fn descend(&self, label: &str) -> SchemaContext {
        let mut child = self.unwrap_into(label);
        child.depth = self.depth.saturating_sub(1);
        child
    }

    /// Child context for a trivial unwrap; depth is unchanged.
    pub fn unwrap_into(&self, label: &str) -> SchemaContext {
        let mut history = String::with_capacity(self.history.len() + label.len() + 3);
        history.push_str(&self.history);
        if !history.is_empty() {
            history.push_str(" > ");
        }
        history.push_str(label);
        SchemaContext {
            shared: Rc::clone(&self.shared),
            bindings: Rc::clone(&self.bindings),
            history,
            depth: self.depth,
            options: self.options,
            span: self.span.clone(),
        }
    }

    /// Context for resolving a deferred definition: full depth again.
    pub fn restart(&self, label: &str) -> SchemaContext {
        let mut child = self.unwrap_into(label);
        child.depth = self.options.max_depth;
        child
    }

    /// Child context with additional parameter bindings. Existing bindings of
    /// the same parameters are replaced.
    pub fn with_bindings(
        &self,
        bindings: impl IntoIterator<Item = (NodeIndex, SchemaNode)>,
    ) -> SchemaContext {
        let mut map = (*self.bindings).clone();
        map.extend(bindings);
        let mut child = self.unwrap_into("bindings");
        child.bindings = Rc::new(map);
        child
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.depth == 0
    }

    #[inline]
    pub fn history(&self) -> &str {
        &self.history
    }

    #[inline]
    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    #[inline]
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn binding(&self, parameter: NodeIndex) -> Option<&SchemaNode> {
        self.bindings.get(&parameter)
    }

    pub fn bindings(&self) -> &FxHashMap<NodeIndex, SchemaNode> {
        &self.bindings
    }

    /// True when both contexts belong to the same evaluation session.
    pub fn shares_tables_with(&self, other: &SchemaContext) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    // =========================================================================
    // Type cache
    // =========================================================================

    pub(crate) fn cached_type(&self, ty: TypeId) -> Option<SchemaNode> {
        self.shared.type_cache.borrow().get(&ty).cloned()
    }

    pub(crate) fn cache_type(&self, ty: TypeId, schema: &SchemaNode) {
        if schema.mentions(DefinitionKey::RecursionLimit) {
            return;
        }
        self.shared.type_cache.borrow_mut().insert(ty, schema.clone());
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    pub fn definition(&self, key: DefinitionKey) -> Option<DefinitionCell> {
        self.shared.definitions.borrow().get(&key).cloned()
    }

    pub fn has_definition(&self, key: DefinitionKey) -> bool {
        self.shared.definitions.borrow().contains_key(&key)
    }

    /// The definition is being computed further up the stack.
    pub fn is_building(&self, key: DefinitionKey) -> bool {
        matches!(
            self.shared.definitions.borrow().get(&key),
            Some(DefinitionCell::Building)
        )
    }

    pub(crate) fn set_definition(&self, key: DefinitionKey, cell: DefinitionCell) {
        self.shared.definitions.borrow_mut().insert(key, cell);
    }

    /// First definition still waiting for the post-pass.
    pub(crate) fn next_deferred(&self) -> Option<(DefinitionKey, TypeId)> {
        self.shared
            .definitions
            .borrow()
            .iter()
            .find_map(|(key, cell)| match cell {
                DefinitionCell::NotStarted { ty } => Some((*key, *ty)),
                _ => None,
            })
    }

    pub(crate) fn take_definitions(&self) -> IndexMap<DefinitionKey, DefinitionCell> {
        std::mem::take(&mut *self.shared.definitions.borrow_mut())
    }

    // =========================================================================
    // Guards
    // =========================================================================

    pub fn is_handling(&self, symbol: SymbolId) -> bool {
        self.shared.symbols_handled.borrow().contains(&symbol)
    }

    pub fn handled_symbols(&self) -> usize {
        self.shared.symbols_handled.borrow().len()
    }

    /// Push `symbol` onto the handled stack. False when it is already there.
    pub(crate) fn enter_symbol(&self, symbol: SymbolId) -> bool {
        let mut handled = self.shared.symbols_handled.borrow_mut();
        if handled.contains(&symbol) {
            return false;
        }
        handled.push(symbol);
        true
    }

    pub(crate) fn leave_symbol(&self, symbol: SymbolId) {
        let mut handled = self.shared.symbols_handled.borrow_mut();
        if let Some(position) = handled.iter().rposition(|&s| s == symbol) {
            handled.remove(position);
        }
    }

    pub(crate) fn enter_type(&self, ty: TypeId) -> RecursionResult {
        self.shared.types_handled.borrow_mut().enter(ty)
    }

    pub(crate) fn leave_type(&self, ty: TypeId) {
        self.shared.types_handled.borrow_mut().leave(ty);
    }

    pub(crate) fn enter_declaration(&self, decl: NodeIndex) -> RecursionResult {
        self.shared.declarations_visiting.borrow_mut().enter(decl)
    }

    pub(crate) fn leave_declaration(&self, decl: NodeIndex) {
        self.shared.declarations_visiting.borrow_mut().leave(decl);
    }

    pub(crate) fn inline_depth(&self) -> u32 {
        self.shared.inline_depth.get()
    }

    pub(crate) fn set_inline_depth(&self, depth: u32) {
        self.shared.inline_depth.set(depth);
    }
}

#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod tests;
