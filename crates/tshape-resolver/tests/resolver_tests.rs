use super::*;
use tshape_ast::{NodeData, NodeFlags, TokenKind};
use tshape_host::{MemoryHost, ObjectFlags, ObjectShape, SymbolFlags, TypeData, TypeId};

fn resolved(host: &MemoryHost, node: NodeIndex) -> ResolvedDefinition {
    match resolve_declaration(host, node, ResolveOptions::default()) {
        Ok(Some(Resolution::Resolved(def))) => def,
        other => panic!("expected a definition, got {other:?}"),
    }
}

fn interface_type(host: &mut MemoryHost, symbol: SymbolId, properties: Vec<SymbolId>) -> TypeId {
    host.add_named_type(
        TypeData::Object(ObjectShape {
            properties,
            flags: ObjectFlags::INTERFACE,
            ..ObjectShape::default()
        }),
        symbol,
    )
}

#[test]
fn literals_carry_only_their_type() {
    let mut arena = NodeArena::new("test.ts");
    let one = arena.add_numeric_literal(1.0);
    arena.const_declaration("one", one);
    let mut host = MemoryHost::new(arena);
    let literal_type = host.number_literal(1.0);

    let def = resolved(&host, one);
    assert_eq!(def.symbol, None);
    assert!(!def.has_declaration());
    assert_eq!(def.type_id(&host), literal_type);
}

#[test]
fn identifier_resolves_to_its_variable() {
    let mut arena = NodeArena::new("test.ts");
    let one = arena.add_numeric_literal(1.0);
    let decl = arena.const_declaration("a", one);
    let reference = arena.add_identifier("a");
    arena.wrap_expression(SyntaxKind::ExpressionStatement, reference);
    let mut host = MemoryHost::new(arena);
    let a = host.declare("a", SymbolFlags::VARIABLE, &[decl]);
    host.set_symbol_type(a, TypeId::NUMBER);
    host.bind(reference, a);

    let def = resolved(&host, reference);
    assert_eq!(def.symbol, Some(a));
    assert_eq!(def.declaration, decl);
    assert_eq!(def.type_id(&host), TypeId::NUMBER);
}

#[test]
fn variable_initialized_from_a_typed_call_takes_the_interface() {
    // interface Shape {}; declare function make(): Shape; const s = make();
    let mut arena = NodeArena::new("test.ts");
    let shape_name = arena.add_identifier("Shape");
    let shape_decl = arena.interface_declaration(shape_name, &[], &[]);
    let callee = arena.add_identifier("make");
    let call = arena.call(SyntaxKind::CallExpression, callee, &[]);
    let decl = arena.const_declaration("s", call);
    let mut host = MemoryHost::new(arena);
    let shape = host.declare("Shape", SymbolFlags::INTERFACE, &[shape_decl]);
    let shape_type = interface_type(&mut host, shape, Vec::new());
    let s = host.declare("s", SymbolFlags::VARIABLE, &[decl]);
    host.set_symbol_type(s, shape_type);
    host.set_type(call, shape_type);

    let def = resolved(&host, decl);
    assert_eq!(def.symbol, Some(shape));
    assert_eq!(def.declaration, shape_decl);
}

#[test]
fn imports_follow_to_the_exporting_declaration() {
    // lib: export const value = "v";
    // import { value } from "./lib"; value;
    let mut arena = NodeArena::new("test.ts");
    let init = arena.add_string_literal("v");
    let export_decl = arena.const_declaration("value", init);
    let imported = arena.add_identifier("value");
    let specifier = arena.specifier(SyntaxKind::ImportSpecifier, NodeIndex::NONE, imported);
    let named = arena.named_bindings(SyntaxKind::NamedImports, &[specifier]);
    let clause = arena.import_clause(NodeIndex::NONE, named);
    arena.module_declaration(SyntaxKind::ImportDeclaration, clause, "./lib");
    let usage = arena.add_identifier("value");
    arena.wrap_expression(SyntaxKind::ExpressionStatement, usage);

    let mut host = MemoryHost::new(arena);
    let export = host.declare("value", SymbolFlags::VARIABLE, &[export_decl]);
    host.set_symbol_type(export, TypeId::STRING);
    let module = host.declare("\"./lib\"", SymbolFlags::MODULE, &[]);
    let module_type = host.object_type(vec![export]);
    host.set_symbol_type(module, module_type);
    host.register_module("./lib", module);
    let alias = host.declare("value", SymbolFlags::ALIAS, &[specifier]);
    host.set_alias_target(alias, export);
    host.bind(usage, alias);

    let from_usage = resolved(&host, usage);
    assert_eq!(from_usage.symbol, Some(export));
    assert_eq!(from_usage.declaration, export_decl);

    let from_specifier = resolved(&host, specifier);
    assert_eq!(from_specifier.symbol, Some(export));
    assert_eq!(from_specifier.declaration, export_decl);
}

#[test]
fn choose_local_keeps_the_import_binding() {
    let mut arena = NodeArena::new("test.ts");
    let init = arena.add_string_literal("v");
    let export_decl = arena.const_declaration("value", init);
    let imported = arena.add_identifier("value");
    let specifier = arena.specifier(SyntaxKind::ImportSpecifier, NodeIndex::NONE, imported);
    let usage = arena.add_identifier("value");
    arena.wrap_expression(SyntaxKind::ExpressionStatement, usage);
    let mut host = MemoryHost::new(arena);
    let export = host.declare("value", SymbolFlags::VARIABLE, &[export_decl]);
    let alias = host.declare("value", SymbolFlags::ALIAS, &[specifier]);
    host.set_alias_target(alias, export);
    host.bind(usage, alias);

    let options = ResolveOptions { choose_local: true };
    let resolver = DeclarationResolver::new(&host, options);
    let def = resolver
        .resolve_definition(usage)
        .expect("resolves")
        .expect("definition");
    assert_eq!(def.symbol, Some(alias));
    assert_eq!(def.declaration, specifier);
}

#[test]
fn alias_without_declaration_is_an_error() {
    let mut arena = NodeArena::new("test.ts");
    let usage = arena.add_identifier("ghost");
    arena.wrap_expression(SyntaxKind::ExpressionStatement, usage);
    let mut host = MemoryHost::new(arena);
    let target = host.declare("ghost", SymbolFlags::VARIABLE, &[]);
    let alias = host.declare("ghost", SymbolFlags::ALIAS, &[]);
    host.set_alias_target(alias, target);
    host.bind(usage, alias);

    let error = resolve_declaration(&host, usage, ResolveOptions::default())
        .expect_err("missing declaration");
    let node_error = error.node_error().expect("node context");
    assert_eq!(node_error.node, usage);
    assert!(matches!(
        error.root_cause(),
        ShapeError::MissingDeclaration { symbol } if *symbol == target
    ));
}

#[test]
fn destructured_names_resolve_to_the_property() {
    // interface Config { port: number }
    // declare const config: Config;
    // const { port } = config;
    let mut arena = NodeArena::new("test.ts");
    let port_name = arena.add_identifier("port");
    let number = arena.add_token(SyntaxKind::NumberKeyword);
    let port_decl = arena.property_member(SyntaxKind::PropertySignature, port_name, number);
    let config_name = arena.add_identifier("Config");
    let config_decl = arena.interface_declaration(config_name, &[], &[port_decl]);
    let config_var_name = arena.add_identifier("config");
    let config_var = arena.var_declaration(config_var_name, NodeIndex::NONE, NodeIndex::NONE);
    arena.var_statement(NodeFlags::CONST, &[config_var]);
    let bound_name = arena.add_identifier("port");
    let element = arena.binding_element(NodeIndex::NONE, bound_name);
    let pattern = arena.binding_pattern(SyntaxKind::ObjectBindingPattern, &[element]);
    let source = arena.add_identifier("config");
    let decl = arena.var_declaration(pattern, NodeIndex::NONE, source);
    arena.var_statement(NodeFlags::CONST, &[decl]);

    let mut host = MemoryHost::new(arena);
    let port = host.property("port", TypeId::NUMBER, port_decl);
    let config = host.declare("Config", SymbolFlags::INTERFACE, &[config_decl]);
    let config_type = interface_type(&mut host, config, vec![port]);
    let config_var_symbol = host.declare("config", SymbolFlags::VARIABLE, &[config_var]);
    host.set_symbol_type(config_var_symbol, config_type);
    host.bind(source, config_var_symbol);

    let from_element = resolved(&host, element);
    assert_eq!(from_element.symbol, Some(port));
    assert_eq!(from_element.declaration, port_decl);

    let from_name = resolved(&host, bound_name);
    assert_eq!(from_name.declaration, port_decl);
}

#[test]
fn any_typed_members_keep_the_binding() {
    let mut arena = NodeArena::new("test.ts");
    let bound_name = arena.add_identifier("loose");
    let element = arena.binding_element(NodeIndex::NONE, bound_name);
    let pattern = arena.binding_pattern(SyntaxKind::ObjectBindingPattern, &[element]);
    let source = arena.add_identifier("bag");
    let decl = arena.var_declaration(pattern, NodeIndex::NONE, source);
    arena.var_statement(NodeFlags::CONST, &[decl]);
    let mut host = MemoryHost::new(arena);
    let loose = host.property("loose", TypeId::ANY, NodeIndex::NONE);
    let bag_type = host.object_type(vec![loose]);
    host.set_type(source, bag_type);
    let local = host.declare("loose", SymbolFlags::VARIABLE, &[element]);

    let def = resolved(&host, element);
    assert_eq!(def.declaration, element);
    assert_eq!(def.symbol, Some(local));
    assert_eq!(def.type_id(&host), TypeId::ANY);
}

#[test]
fn array_destructuring_uses_the_element_identity() {
    // const [first] = [shape];
    let mut arena = NodeArena::new("test.ts");
    let shape_name = arena.add_identifier("Shape");
    let shape_decl = arena.interface_declaration(shape_name, &[], &[]);
    let bound_name = arena.add_identifier("first");
    let element = arena.binding_element(NodeIndex::NONE, bound_name);
    let pattern = arena.binding_pattern(SyntaxKind::ArrayBindingPattern, &[element]);
    let source = arena.add_identifier("shapes");
    let decl = arena.var_declaration(pattern, NodeIndex::NONE, source);
    arena.var_statement(NodeFlags::CONST, &[decl]);
    let mut host = MemoryHost::new(arena);
    let shape = host.declare("Shape", SymbolFlags::INTERFACE, &[shape_decl]);
    let shape_type = interface_type(&mut host, shape, Vec::new());
    let shapes = host.intern(TypeData::Array(shape_type));
    host.set_type(source, shapes);

    let def = resolved(&host, element);
    assert_eq!(def.symbol, Some(shape));
    assert_eq!(def.declaration, shape_decl);
    assert_eq!(def.type_id(&host), shape_type);
}

#[test]
fn object_literal_members_use_the_contextual_type() {
    // const options: Options = { verbose: true };
    let mut arena = NodeArena::new("test.ts");
    let verbose_name = arena.add_identifier("verbose");
    let boolean = arena.add_token(SyntaxKind::BooleanKeyword);
    let verbose_decl = arena.property_member(SyntaxKind::PropertySignature, verbose_name, boolean);
    let yes = arena.add_token(SyntaxKind::TrueKeyword);
    let assignment = arena.property_assignment("verbose", yes);
    let object = arena.literal_expression(SyntaxKind::ObjectLiteralExpression, &[assignment]);
    arena.const_declaration("options", object);
    let mut host = MemoryHost::new(arena);
    let verbose = host.property("verbose", TypeId::BOOLEAN, verbose_decl);
    let options = host.declare("Options", SymbolFlags::INTERFACE, &[]);
    let options_type = interface_type(&mut host, options, vec![verbose]);
    host.set_contextual_type(object, options_type);

    let def = resolved(&host, assignment);
    assert_eq!(def.symbol, Some(verbose));
    assert_eq!(def.declaration, verbose_decl);

    // The property name itself deliberately resolves to nothing.
    let name = host.arena().name_of(assignment);
    assert!(matches!(
        resolve_declaration(&host, name, ResolveOptions::default()),
        Ok(None)
    ));
}

#[test]
fn overriding_member_resolves_to_the_interface_declaration() {
    // interface Base { run(): void }
    // class Impl implements Base { run() {} }
    // impl.run
    let mut arena = NodeArena::new("test.ts");
    let base_run_name = arena.add_identifier("run");
    let base_run = arena.function_like(
        SyntaxKind::MethodSignature,
        base_run_name,
        &[],
        NodeIndex::NONE,
        NodeIndex::NONE,
    );
    let base_name = arena.add_identifier("Base");
    let base_decl = arena.interface_declaration(base_name, &[], &[base_run]);
    let impl_run_name = arena.add_identifier("run");
    let body = arena.block(&[]);
    let impl_run = arena.function_like(
        SyntaxKind::MethodDeclaration,
        impl_run_name,
        &[],
        NodeIndex::NONE,
        body,
    );
    let base_ref_name = arena.add_identifier("Base");
    let base_ref = arena.type_reference(SyntaxKind::ExpressionWithTypeArguments, base_ref_name, &[]);
    let clause = arena.heritage_clause(TokenKind::ImplementsKeyword, &[base_ref]);
    let impl_name = arena.add_identifier("Impl");
    let impl_decl = arena.class_declaration(impl_name, &[clause], &[impl_run]);
    let receiver = arena.add_identifier("impl");
    let access = arena.property_access(receiver, "run");
    let access_name = host_name(&arena, access);

    let mut host = MemoryHost::new(arena);
    let signature = host.add_signature(tshape_host::SignatureInfo {
        declaration: NodeIndex::NONE,
        type_parameters: Vec::new(),
        parameters: Vec::new(),
        return_type: TypeId::VOID,
        has_rest: false,
        min_argument_count: 0,
    });
    let method_type = host.function_type(signature, None);
    let base_run_symbol = host.declare("run", SymbolFlags::METHOD, &[base_run]);
    host.set_symbol_type(base_run_symbol, method_type);
    let base = host.declare("Base", SymbolFlags::INTERFACE, &[base_decl]);
    let base_type = interface_type(&mut host, base, vec![base_run_symbol]);
    host.set_type(base_ref, base_type);
    let impl_run_symbol = host.declare("run", SymbolFlags::METHOD, &[impl_run]);
    host.set_symbol_type(impl_run_symbol, method_type);
    let class = host.declare("Impl", SymbolFlags::CLASS, &[impl_decl]);
    let class_type = host.add_named_type(
        TypeData::Object(ObjectShape {
            properties: vec![impl_run_symbol],
            flags: ObjectFlags::CLASS,
            ..ObjectShape::default()
        }),
        class,
    );
    host.set_type(receiver, class_type);
    host.bind(access_name, impl_run_symbol);
    host.set_type(access, method_type);

    let def = resolved(&host, access);
    assert_eq!(def.symbol, Some(base_run_symbol));
    assert_eq!(def.declaration, base_run);

    // The member name in an access redirects to the access.
    let via_name = resolved(&host, access_name);
    assert_eq!(via_name.declaration, base_run);
}

fn host_name(arena: &NodeArena, access: NodeIndex) -> NodeIndex {
    arena
        .get(access)
        .and_then(|node| arena.get_access_expr(node))
        .map(|data| data.name_or_argument)
        .unwrap_or(NodeIndex::NONE)
}

#[test]
fn self_referencing_initializer_terminates() {
    // const x = x;
    let mut arena = NodeArena::new("test.ts");
    let reference = arena.add_identifier("x");
    let decl = arena.const_declaration("x", reference);
    let mut host = MemoryHost::new(arena);
    let x = host.declare("x", SymbolFlags::VARIABLE, &[decl]);
    host.bind(reference, x);

    let def = resolved(&host, decl);
    assert_eq!(def.symbol, Some(x));
    assert_eq!(def.declaration, decl);
}

#[test]
fn statements_without_values_resolve_to_nothing() {
    let mut arena = NodeArena::new("test.ts");
    let bare_return = arena.return_statement(NodeIndex::NONE);
    let block = arena.block(&[]);
    let host = MemoryHost::new(arena);

    for node in [bare_return, block] {
        assert!(matches!(
            resolve_declaration(&host, node, ResolveOptions::default()),
            Ok(Some(Resolution::Nothing))
        ));
    }
}

#[test]
fn mismatched_payload_is_a_node_scoped_error() {
    let mut arena = NodeArena::new("broken.ts");
    let node = arena.add_node(SyntaxKind::VariableDeclaration, NodeData::None);
    let host = MemoryHost::new(arena);

    let error = resolve_declaration(&host, node, ResolveOptions::default())
        .expect_err("shape error");
    let node_error = error.node_error().expect("node context");
    assert_eq!(node_error.node_kind, SyntaxKind::VariableDeclaration);
    assert_eq!(node_error.file, "broken.ts");
    assert!(matches!(
        error.root_cause(),
        ShapeError::UnexpectedNodeShape { found: SyntaxKind::VariableDeclaration, .. }
    ));
}

#[test]
fn every_kind_resolves_without_error() {
    let mut arena = NodeArena::new("synthetic.ts");
    let nodes: Vec<NodeIndex> = SyntaxKind::ALL
        .iter()
        .map(|&kind| arena.add_synthetic(kind))
        .collect();
    let host = MemoryHost::new(arena);
    let resolver = DeclarationResolver::new(&host, ResolveOptions::default());

    for node in nodes {
        let kind = host.arena().kind(node);
        if let Err(error) = resolver.resolve(node) {
            panic!("{kind:?} failed: {error}");
        }
    }
}

#[test]
fn resolving_twice_gives_the_same_target() {
    let mut arena = NodeArena::new("test.ts");
    let one = arena.add_numeric_literal(1.0);
    let decl = arena.const_declaration("a", one);
    let reference = arena.add_identifier("a");
    arena.wrap_expression(SyntaxKind::ExpressionStatement, reference);
    let mut host = MemoryHost::new(arena);
    let a = host.declare("a", SymbolFlags::VARIABLE, &[decl]);
    host.set_symbol_type(a, TypeId::NUMBER);
    host.bind(reference, a);

    let resolver = DeclarationResolver::new(&host, ResolveOptions::default());
    let first = resolver.resolve_definition(reference).expect("ok").expect("def");
    let second = resolver.resolve_definition(reference).expect("ok").expect("def");
    assert!(first.same_target(&second));
    let followed = resolver.follow(first.clone()).expect("follow");
    assert!(followed.same_target(&first));
}
