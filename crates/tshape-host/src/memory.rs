//! In-memory `TypeQuery` implementation.
//!
//! Holds a syntax tree plus explicit symbol, type and signature tables. The
//! tables are filled through the builder methods below; literal and keyword
//! nodes get their types assigned automatically when the host is created.

use crate::ids::{SignatureId, SymbolId, TypeId};
use crate::printer::TypePrinter;
use crate::query::TypeQuery;
use crate::symbols::{SignatureInfo, SymbolFlags, SymbolInfo};
use crate::types::{LiteralValue, ObjectFlags, ObjectShape, TypeData};
use rustc_hash::FxHashMap;
use tshape_ast::{NodeArena, NodeIndex, SyntaxKind};

#[derive(Clone, Debug)]
struct TypeRecord {
    data: TypeData,
    symbol: Option<SymbolId>,
    alias_symbol: Option<SymbolId>,
    alias_type_arguments: Vec<TypeId>,
}

impl TypeRecord {
    fn new(data: TypeData) -> Self {
        TypeRecord {
            data,
            symbol: None,
            alias_symbol: None,
            alias_type_arguments: Vec::new(),
        }
    }
}

pub struct MemoryHost {
    arena: NodeArena,
    types: Vec<TypeRecord>,
    interned: FxHashMap<TypeData, TypeId>,
    symbols: Vec<SymbolInfo>,
    signatures: Vec<SignatureInfo>,
    symbol_types: FxHashMap<SymbolId, TypeId>,
    node_symbols: FxHashMap<NodeIndex, SymbolId>,
    node_types: FxHashMap<NodeIndex, TypeId>,
    contextual_types: FxHashMap<NodeIndex, TypeId>,
    resolved_signatures: FxHashMap<NodeIndex, SignatureId>,
    alias_targets: FxHashMap<SymbolId, SymbolId>,
    module_symbols: FxHashMap<String, SymbolId>,
    resolved_structures: FxHashMap<TypeId, TypeId>,
}

impl MemoryHost {
    pub fn new(arena: NodeArena) -> Self {
        let mut types = Vec::with_capacity(TypeId::FIRST_USER as usize + 64);
        let mut interned = FxHashMap::default();
        for id in 0..TypeId::FIRST_USER {
            let data = match TypeData::intrinsic_of(TypeId(id)) {
                Some(data) => {
                    if id != TypeId::ERROR.0 {
                        interned.insert(data.clone(), TypeId(id));
                    }
                    data
                }
                None => TypeData::Error,
            };
            types.push(TypeRecord::new(data));
        }
        let mut host = MemoryHost {
            arena,
            types,
            interned,
            symbols: Vec::new(),
            signatures: Vec::new(),
            symbol_types: FxHashMap::default(),
            node_symbols: FxHashMap::default(),
            node_types: FxHashMap::default(),
            contextual_types: FxHashMap::default(),
            resolved_signatures: FxHashMap::default(),
            alias_targets: FxHashMap::default(),
            module_symbols: FxHashMap::default(),
            resolved_structures: FxHashMap::default(),
        };
        host.assign_literal_types();
        host
    }

    /// Give literal and keyword nodes the type they denote.
    fn assign_literal_types(&mut self) {
        let indices: Vec<NodeIndex> = self.arena.indices().collect();
        for index in indices {
            let Some(node) = self.arena.get(index) else {
                continue;
            };
            let ty = match node.kind {
                SyntaxKind::NumericLiteral => self
                    .arena
                    .get_literal(node)
                    .and_then(|l| l.value)
                    .map(|value| TypeData::Literal(LiteralValue::number(value))),
                SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral => self
                    .arena
                    .get_literal(node)
                    .map(|l| TypeData::Literal(LiteralValue::String(l.text.clone()))),
                SyntaxKind::BigIntLiteral => self
                    .arena
                    .get_literal(node)
                    .map(|l| TypeData::Literal(LiteralValue::BigInt(l.text.clone()))),
                _ => None,
            };
            let ty = match ty {
                Some(data) => self.intern(data),
                None => match keyword_type(node.kind) {
                    Some(ty) => ty,
                    None => continue,
                },
            };
            self.node_types.insert(index, ty);
        }
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    // ============================================================================
    // Types
    // ============================================================================

    /// Intern a structural type; equal structures share one id.
    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }
        let id = self.add_type(data.clone());
        self.interned.insert(data, id);
        id
    }

    /// Add a type with a fresh identity.
    pub fn add_type(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeRecord::new(data));
        id
    }

    /// Add a type with a fresh identity and a nominal symbol.
    pub fn add_named_type(&mut self, data: TypeData, symbol: SymbolId) -> TypeId {
        let id = self.add_type(data);
        if let Some(record) = self.types.get_mut(id.0 as usize) {
            record.symbol = Some(symbol);
        }
        id
    }

    /// Replace the structure of a type created earlier, for recursive types.
    pub fn set_type_data(&mut self, ty: TypeId, data: TypeData) {
        if let Some(record) = self.types.get_mut(ty.0 as usize) {
            record.data = data;
        }
    }

    pub fn set_alias(&mut self, ty: TypeId, alias: SymbolId, type_arguments: Vec<TypeId>) {
        if let Some(record) = self.types.get_mut(ty.0 as usize) {
            record.alias_symbol = Some(alias);
            record.alias_type_arguments = type_arguments;
        }
    }

    pub fn string_literal(&mut self, value: &str) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::String(value.to_string())))
    }

    pub fn number_literal(&mut self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::number(value)))
    }

    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Union(members))
    }

    /// Anonymous object type with the given property symbols.
    pub fn object_type(&mut self, properties: Vec<SymbolId>) -> TypeId {
        self.add_type(TypeData::Object(ObjectShape {
            properties,
            flags: ObjectFlags::ANONYMOUS,
            ..ObjectShape::default()
        }))
    }

    pub fn set_resolved_structure(&mut self, ty: TypeId, resolved: TypeId) {
        self.resolved_structures.insert(ty, resolved);
    }

    // ============================================================================
    // Symbols
    // ============================================================================

    pub fn add_symbol(&mut self, info: SymbolInfo) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(info);
        id
    }

    /// Declare a symbol for the given declarations. Each declaration and its
    /// name node are bound to the symbol.
    pub fn declare(
        &mut self,
        name: &str,
        flags: SymbolFlags,
        declarations: &[NodeIndex],
    ) -> SymbolId {
        let mut info = SymbolInfo::new(name, flags);
        info.declarations = declarations.to_vec();
        if flags.intersects(
            SymbolFlags::VARIABLE
                | SymbolFlags::FUNCTION
                | SymbolFlags::CLASS
                | SymbolFlags::ENUM
                | SymbolFlags::ENUM_MEMBER
                | SymbolFlags::PROPERTY
                | SymbolFlags::METHOD
                | SymbolFlags::PARAMETER,
        ) {
            info.value_declaration = declarations.first().copied().unwrap_or(NodeIndex::NONE);
        }
        let id = self.add_symbol(info);
        for &decl in declarations {
            self.bind_declaration(decl, id);
        }
        id
    }

    /// Declare a property symbol with a type.
    pub fn property(&mut self, name: &str, ty: TypeId, declaration: NodeIndex) -> SymbolId {
        let declarations: Vec<NodeIndex> = declaration.into_option().into_iter().collect();
        let id = self.declare(name, SymbolFlags::PROPERTY, &declarations);
        self.set_symbol_type(id, ty);
        id
    }

    fn bind_declaration(&mut self, decl: NodeIndex, symbol: SymbolId) {
        if decl.is_none() {
            return;
        }
        self.node_symbols.entry(decl).or_insert(symbol);
        let name = self.arena.name_of(decl);
        if name.is_some() {
            self.node_symbols.insert(name, symbol);
        }
    }

    pub fn symbol_mut(&mut self, symbol: SymbolId) -> Option<&mut SymbolInfo> {
        self.symbols.get_mut(symbol.0 as usize)
    }

    pub fn set_symbol_type(&mut self, symbol: SymbolId, ty: TypeId) {
        self.symbol_types.insert(symbol, ty);
    }

    pub fn set_alias_target(&mut self, alias: SymbolId, target: SymbolId) {
        self.alias_targets.insert(alias, target);
    }

    pub fn register_module(&mut self, specifier: &str, module: SymbolId) {
        self.module_symbols.insert(specifier.to_string(), module);
    }

    // ============================================================================
    // Nodes
    // ============================================================================

    pub fn bind(&mut self, node: NodeIndex, symbol: SymbolId) {
        self.node_symbols.insert(node, symbol);
    }

    pub fn set_type(&mut self, node: NodeIndex, ty: TypeId) {
        self.node_types.insert(node, ty);
    }

    pub fn set_contextual_type(&mut self, node: NodeIndex, ty: TypeId) {
        self.contextual_types.insert(node, ty);
    }

    // ============================================================================
    // Signatures
    // ============================================================================

    pub fn add_signature(&mut self, info: SignatureInfo) -> SignatureId {
        let id = SignatureId(self.signatures.len() as u32);
        self.signatures.push(info);
        id
    }

    pub fn set_resolved_signature(&mut self, call: NodeIndex, signature: SignatureId) {
        self.resolved_signatures.insert(call, signature);
    }

    /// Function type with a single call signature, symbol-tagged when given.
    pub fn function_type(&mut self, signature: SignatureId, symbol: Option<SymbolId>) -> TypeId {
        let data = TypeData::Object(ObjectShape {
            call_signatures: vec![signature],
            flags: ObjectFlags::ANONYMOUS,
            ..ObjectShape::default()
        });
        match symbol {
            Some(symbol) => self.add_named_type(data, symbol),
            None => self.add_type(data),
        }
    }
}

fn keyword_type(kind: SyntaxKind) -> Option<TypeId> {
    Some(match kind {
        SyntaxKind::TrueKeyword => TypeId::BOOLEAN_TRUE,
        SyntaxKind::FalseKeyword => TypeId::BOOLEAN_FALSE,
        SyntaxKind::NullKeyword => TypeId::NULL,
        SyntaxKind::AnyKeyword => TypeId::ANY,
        SyntaxKind::UnknownKeyword => TypeId::UNKNOWN,
        SyntaxKind::NeverKeyword => TypeId::NEVER,
        SyntaxKind::VoidKeyword => TypeId::VOID,
        SyntaxKind::UndefinedKeyword => TypeId::UNDEFINED,
        SyntaxKind::BooleanKeyword => TypeId::BOOLEAN,
        SyntaxKind::NumberKeyword => TypeId::NUMBER,
        SyntaxKind::StringKeyword => TypeId::STRING,
        SyntaxKind::BigIntKeyword => TypeId::BIGINT,
        SyntaxKind::SymbolKeyword => TypeId::SYMBOL,
        SyntaxKind::ObjectKeyword => TypeId::OBJECT,
        _ => return None,
    })
}

impl TypeQuery for MemoryHost {
    fn arena(&self) -> &NodeArena {
        &self.arena
    }

    fn symbol_at(&self, node: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    fn type_of_symbol_at(&self, symbol: SymbolId, _node: NodeIndex) -> TypeId {
        let symbol = self.alias_target_of(symbol);
        self.symbol_types
            .get(&symbol)
            .copied()
            .unwrap_or(TypeId::ERROR)
    }

    fn type_at(&self, node: NodeIndex) -> TypeId {
        if let Some(&ty) = self.node_types.get(&node) {
            return ty;
        }
        match self.symbol_at(node) {
            Some(symbol) => self.type_of_symbol_at(symbol, node),
            None => TypeId::ERROR,
        }
    }

    fn contextual_type_of(&self, node: NodeIndex) -> Option<TypeId> {
        self.contextual_types.get(&node).copied()
    }

    fn resolved_signature_of(&self, call_or_new: NodeIndex) -> Option<SignatureId> {
        self.resolved_signatures.get(&call_or_new).copied()
    }

    fn alias_target_of(&self, symbol: SymbolId) -> SymbolId {
        let mut current = symbol;
        // Re-export chains are short; the bound keeps a malformed table from looping.
        for _ in 0..32 {
            match self.alias_targets.get(&current) {
                Some(&next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }

    fn type_data(&self, ty: TypeId) -> Option<&TypeData> {
        self.types.get(ty.0 as usize).map(|record| &record.data)
    }

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.types.get(ty.0 as usize).and_then(|record| record.symbol)
    }

    fn alias_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.types
            .get(ty.0 as usize)
            .and_then(|record| record.alias_symbol)
    }

    fn alias_type_arguments(&self, ty: TypeId) -> &[TypeId] {
        self.types
            .get(ty.0 as usize)
            .map(|record| record.alias_type_arguments.as_slice())
            .unwrap_or(&[])
    }

    fn symbol_info(&self, symbol: SymbolId) -> Option<&SymbolInfo> {
        self.symbols.get(symbol.0 as usize)
    }

    fn signature_info(&self, signature: SignatureId) -> Option<&SignatureInfo> {
        self.signatures.get(signature.0 as usize)
    }

    fn external_module_symbol(&self, module_specifier: NodeIndex) -> Option<SymbolId> {
        let node = self.arena.get(module_specifier)?;
        let text = self.arena.get_literal(node)?;
        self.module_symbols.get(&text.text).copied()
    }

    fn resolved_structure(&self, ty: TypeId) -> Option<TypeId> {
        self.resolved_structures.get(&ty).copied()
    }

    fn type_to_display_string(&self, ty: TypeId) -> String {
        TypePrinter::new(self).print_type(ty)
    }
}

#[cfg(test)]
#[path = "../tests/memory_host_tests.rs"]
mod tests;
