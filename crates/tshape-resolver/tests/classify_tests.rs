use super::*;
use tshape_ast::TokenKind;
use tshape_host::{MemoryHost, SymbolInfo, TupleElement};

#[test]
fn declaration_names_and_assignment_targets() {
    let mut arena = NodeArena::new("test.ts");
    let value = arena.add_numeric_literal(1.0);
    let decl = arena.const_declaration("x", value);
    let name = arena.name_of(decl);
    let target = arena.add_identifier("x");
    let two = arena.add_numeric_literal(2.0);
    let assignment = arena.binary(target, TokenKind::Equals, two);
    let lhs = arena.add_identifier("y");
    let rhs = arena.add_identifier("z");
    arena.binary(lhs, TokenKind::Plus, rhs);

    assert!(is_declaration_name(&arena, name));
    assert!(!is_declaration_name(&arena, value));
    assert!(is_assignment_target(&arena, target));
    assert!(!is_assignment_target(&arena, two));
    assert!(!is_assignment_target(&arena, lhs));
    assert_eq!(arena.parent_of(target), assignment);
}

#[test]
fn argument_positions() {
    let mut arena = NodeArena::new("test.ts");
    let callee = arena.add_identifier("f");
    let arg = arena.add_identifier("a");
    arena.call(SyntaxKind::CallExpression, callee, &[arg]);
    let element = arena.add_identifier("e");
    arena.literal_expression(SyntaxKind::ArrayLiteralExpression, &[element]);

    assert!(is_argument_position(&arena, arg));
    assert!(is_argument_position(&arena, element));
    assert!(!is_argument_position(&arena, callee));
}

#[test]
fn inheriting_members_know_their_owner() {
    let mut arena = NodeArena::new("test.ts");
    let base_name = arena.add_identifier("Base");
    let base_ref = arena.type_reference(SyntaxKind::ExpressionWithTypeArguments, base_name, &[]);
    let clause = arena.heritage_clause(TokenKind::ExtendsKeyword, &[base_ref]);
    let member_name = arena.add_identifier("size");
    let member = arena.property_member(SyntaxKind::PropertyDeclaration, member_name, NodeIndex::NONE);
    let class_name = arena.add_identifier("Derived");
    let class = arena.class_declaration(class_name, &[clause], &[member]);
    let plain_name = arena.add_identifier("Plain");
    let plain = arena.class_declaration(plain_name, &[], &[]);

    assert!(is_inheriting_declaration(&arena, class));
    assert!(!is_inheriting_declaration(&arena, plain));
    assert!(is_member_declaration(SyntaxKind::PropertyDeclaration));
    assert!(!is_member_declaration(SyntaxKind::Constructor));
    assert_eq!(member_owner(&arena, member), Some(class));
    assert_eq!(enclosing_class(&arena, member_name), Some(class));
}

#[test]
fn tuple_elements_and_rest_positions() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let strings = host.intern(TypeData::Array(TypeId::STRING));
    let mut rest = TupleElement::required(strings);
    rest.flags = ElementFlags::REST;
    let tuple = host.intern(TypeData::Tuple(vec![TupleElement::required(TypeId::NUMBER), rest]));

    assert_eq!(indexed_element_type(&host, tuple, 0), Some(TypeId::NUMBER));
    assert_eq!(indexed_element_type(&host, tuple, 1), Some(TypeId::STRING));
    assert_eq!(indexed_element_type(&host, tuple, 5), Some(TypeId::STRING));
    assert_eq!(indexed_element_type(&host, strings, 3), Some(TypeId::STRING));
    assert_eq!(indexed_element_type(&host, TypeId::NUMBER, 0), None);
}

#[test]
fn array_references_unwrap_their_argument() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let array_symbol = host.declare("Array", SymbolFlags::INTERFACE, &[]);
    let generic = host.add_named_type(TypeData::Object(Default::default()), array_symbol);
    let numbers = host.intern(TypeData::Reference {
        target: generic,
        type_arguments: vec![TypeId::NUMBER],
    });

    assert!(is_array_symbol(&host, array_symbol));
    assert_eq!(array_element_type(&host, numbers), Some(TypeId::NUMBER));
    assert_eq!(indexed_element_type(&host, numbers, 7), Some(TypeId::NUMBER));
}

#[test]
fn const_assertions() {
    let mut arena = NodeArena::new("test.ts");
    let flagged_value = arena.add_string_literal("a");
    let flagged = arena.as_const(flagged_value);
    let const_name = arena.add_identifier("const");
    let const_ref = arena.type_reference(SyntaxKind::TypeReference, const_name, &[]);
    let written_value = arena.add_string_literal("b");
    let written = arena.type_assertion(SyntaxKind::TypeAssertionExpression, written_value, const_ref);
    let other_name = arena.add_identifier("Other");
    let other_ref = arena.type_reference(SyntaxKind::TypeReference, other_name, &[]);
    let other_value = arena.add_string_literal("c");
    let other = arena.type_assertion(SyntaxKind::AsExpression, other_value, other_ref);

    assert!(is_const_assertion(&arena, flagged));
    assert!(is_const_assertion(&arena, written));
    assert!(!is_const_assertion(&arena, other));
}

#[test]
fn symbol_targets_unwrap_aliases_and_transients() {
    let mut arena = NodeArena::new("test.ts");
    let value = arena.add_numeric_literal(1.0);
    let decl = arena.const_declaration("origin", value);
    let mut host = MemoryHost::new(arena);
    let origin = host.declare("origin", SymbolFlags::VARIABLE, &[decl]);
    let alias = host.declare("origin", SymbolFlags::ALIAS, &[]);
    host.set_alias_target(alias, origin);
    let mut transient = SymbolInfo::new("origin", SymbolFlags::TRANSIENT | SymbolFlags::PROPERTY);
    transient.target = Some(alias);
    let transient = host.add_symbol(transient);

    assert_eq!(unwrap_symbol_target(&host, alias), origin);
    assert_eq!(unwrap_symbol_target(&host, transient), origin);
    assert_eq!(unwrap_symbol_target(&host, origin), origin);
    assert!(is_trackable(&host, origin));
    assert!(!is_trackable(&host, alias));
}

#[test]
fn type_identity_prefers_the_alias() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let interface = host.declare("Shape", SymbolFlags::INTERFACE, &[]);
    let alias = host.declare("ShapeAlias", SymbolFlags::TYPE_ALIAS, &[]);
    let ty = host.add_named_type(TypeData::Object(Default::default()), interface);
    assert_eq!(type_identity_symbol(&host, ty), Some(interface));
    host.set_alias(ty, alias, Vec::new());
    assert_eq!(type_identity_symbol(&host, ty), Some(alias));
    assert_eq!(type_identity_symbol(&host, TypeId::ANY), None);
    assert!(is_intrinsic_type(&host, TypeId::STRING));
    assert!(!is_intrinsic_type(&host, ty));
}

#[test]
fn prototype_symbols_are_flagged() {
    let mut host = MemoryHost::new(NodeArena::new("test.ts"));
    let prototype = host.declare("prototype", SymbolFlags::PROPERTY | SymbolFlags::PROTOTYPE, &[]);
    let named_like_it = host.declare("prototype", SymbolFlags::PROPERTY, &[]);
    assert!(is_prototype_symbol(&host, prototype));
    assert!(!is_prototype_symbol(&host, named_like_it));
}
