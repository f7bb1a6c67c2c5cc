use super::*;
use crate::types::{IndexSignature, TupleElement};
use crate::SignatureKind;
use tshape_ast::{NodeData, VariableDeclarationData};

fn declaration(arena: &mut NodeArena, name: &str, initializer: NodeIndex) -> NodeIndex {
    let name = arena.add_identifier(name);
    arena.add_node(
        SyntaxKind::VariableDeclaration,
        NodeData::VariableDeclaration(VariableDeclarationData {
            name,
            exclamation_token: false,
            type_annotation: NodeIndex::NONE,
            initializer,
        }),
    )
}

#[test]
fn literal_nodes_get_literal_types() {
    let mut arena = NodeArena::new("test.ts");
    let one = arena.add_numeric_literal(1.0);
    let text = arena.add_string_literal("hi");
    let yes = arena.add_token(SyntaxKind::TrueKeyword);
    let keyword = arena.add_token(SyntaxKind::StringKeyword);
    let mut host = MemoryHost::new(arena);

    let one_type = host.type_at(one);
    assert_eq!(
        host.type_data(one_type),
        Some(&TypeData::Literal(LiteralValue::number(1.0)))
    );
    let hi = host.string_literal("hi");
    assert_eq!(host.type_at(text), hi);
    assert_eq!(host.type_at(yes), TypeId::BOOLEAN_TRUE);
    assert_eq!(host.type_at(keyword), TypeId::STRING);
}

#[test]
fn intern_shares_structural_types() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let a = host.union(vec![TypeId::STRING, TypeId::NUMBER]);
    let b = host.union(vec![TypeId::STRING, TypeId::NUMBER]);
    assert_eq!(a, b);
    assert_eq!(host.intern(TypeData::Intrinsic(crate::IntrinsicKind::Number)), TypeId::NUMBER);

    let first = host.object_type(Vec::new());
    let second = host.object_type(Vec::new());
    assert_ne!(first, second, "object types keep their own identity");
}

#[test]
fn declare_binds_declaration_and_name() {
    let mut arena = NodeArena::new("test.ts");
    let init = arena.add_numeric_literal(3.0);
    let decl = declaration(&mut arena, "x", init);
    let name = arena.name_of(decl);
    let mut host = MemoryHost::new(arena);

    let symbol = host.declare("x", SymbolFlags::VARIABLE, &[decl]);
    host.set_symbol_type(symbol, TypeId::NUMBER);

    assert_eq!(host.symbol_at(decl), Some(symbol));
    assert_eq!(host.symbol_at(name), Some(symbol));
    assert_eq!(host.type_at(name), TypeId::NUMBER);
    let info = host.symbol_info(symbol).expect("symbol");
    assert_eq!(info.primary_declaration(), decl);
    assert_eq!(host.symbol_name(symbol), "x");
}

#[test]
fn alias_chains_unwrap_to_the_target() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let target = host.declare("value", SymbolFlags::VARIABLE, &[]);
    let reexport = host.declare("value", SymbolFlags::ALIAS, &[]);
    let import = host.declare("value", SymbolFlags::ALIAS, &[]);
    host.set_alias_target(import, reexport);
    host.set_alias_target(reexport, target);
    host.set_symbol_type(target, TypeId::STRING);

    assert_eq!(host.alias_target_of(import), target);
    assert_eq!(host.alias_target_of(target), target);
    assert_eq!(host.type_of_symbol_at(import, NodeIndex::NONE), TypeId::STRING);
}

#[test]
fn property_lookup_is_first_match() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let first = host.property("a", TypeId::STRING, NodeIndex::NONE);
    let second = host.property("a", TypeId::NUMBER, NodeIndex::NONE);
    let b = host.property("b", TypeId::BOOLEAN, NodeIndex::NONE);
    let object = host.object_type(vec![first, second, b]);

    assert_eq!(host.property_named(object, "a"), Some(first));
    assert_eq!(host.property_named(object, "b"), Some(b));
    assert_eq!(host.property_named(object, "c"), None);
}

#[test]
fn references_expose_their_resolved_structure() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let prop = host.property("items", TypeId::NUMBER, NodeIndex::NONE);
    let mut shape = ObjectShape {
        properties: vec![prop],
        ..ObjectShape::default()
    };
    shape.index_signatures.push(IndexSignature {
        key_type: TypeId::STRING,
        value_type: TypeId::NUMBER,
        readonly: false,
    });
    let resolved = host.add_type(TypeData::Object(shape));
    let generic = host.add_type(TypeData::TypeParameter {
        name: "T".into(),
        constraint: None,
    });
    let reference = host.intern(TypeData::Reference {
        target: generic,
        type_arguments: vec![TypeId::NUMBER],
    });
    host.set_resolved_structure(reference, resolved);

    assert_eq!(host.property_named(reference, "items"), Some(prop));
    assert_eq!(host.index_signatures_of(reference).len(), 1);
}

#[test]
fn signatures_and_return_types() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let signature = host.add_signature(SignatureInfo {
        declaration: NodeIndex::NONE,
        type_parameters: Vec::new(),
        parameters: Vec::new(),
        return_type: TypeId::STRING,
        has_rest: false,
        min_argument_count: 0,
    });
    let function = host.function_type(signature, None);

    assert_eq!(host.signatures_of(function, SignatureKind::Call), vec![signature]);
    assert!(host.signatures_of(function, SignatureKind::Construct).is_empty());
    assert_eq!(host.return_type_of(signature), TypeId::STRING);
}

#[test]
fn display_strings_use_names_and_structure() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let alias = host.declare("Pair", SymbolFlags::TYPE_ALIAS, &[]);
    let tuple = host.intern(TypeData::Tuple(vec![
        TupleElement::required(TypeId::STRING),
        TupleElement::required(TypeId::NUMBER),
    ]));
    assert_eq!(host.type_to_display_string(tuple), "[string, number]");

    host.set_alias(tuple, alias, Vec::new());
    assert_eq!(host.type_to_display_string(tuple), "Pair");

    let lits = vec![host.number_literal(1.0), host.number_literal(2.0)];
    let union = host.union(lits);
    assert_eq!(host.type_to_display_string(union), "1 | 2");
}

#[test]
fn unknown_nodes_have_the_error_type() {
    let mut arena = NodeArena::new("test.ts");
    let ident = arena.add_identifier("missing");
    let host = MemoryHost::new(arena);
    assert_eq!(host.type_at(ident), TypeId::ERROR);
    assert!(host.type_at(ident).is_any_like());
    assert_eq!(host.symbol_at(ident), None);
}
