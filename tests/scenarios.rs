//! End-to-end scenarios over programs built with `MemoryHost`.

use tshape::ast::{NodeArena, NodeFlags, NodeIndex, SyntaxKind, TokenKind};
use tshape::host::{
    IntrinsicKind, LiteralValue, ObjectFlags, ObjectShape, SymbolFlags, TemplateSpan, TypeData,
};
use tshape::{
    CallContext, MemoryHost, Resolution, ResolveOptions, ResolvedDefinition, SchemaEvaluator,
    SchemaKind, SchemaNode, SchemaOptions, TypeId, evaluate_schema, evaluate_type_schema,
    load_calls, resolve_declaration,
};

fn resolved(host: &MemoryHost, node: NodeIndex) -> ResolvedDefinition {
    match resolve_declaration(host, node, ResolveOptions::default()) {
        Ok(Some(Resolution::Resolved(def))) => def,
        other => panic!("expected a definition, got {other:?}"),
    }
}

/// `function name(param) { <statements>; return <value>; }`
fn function(
    arena: &mut NodeArena,
    name: &str,
    param: NodeIndex,
    statements: &[NodeIndex],
    value: NodeIndex,
) -> NodeIndex {
    let ret = arena.return_statement(value);
    let mut body = statements.to_vec();
    body.push(ret);
    let block = arena.block(&body);
    let ident = arena.add_identifier(name);
    arena.function_like(SyntaxKind::FunctionDeclaration, ident, &[param], NodeIndex::NONE, block)
}

#[test]
fn annotated_const_resolves_to_the_annotated_type() {
    // interface Point { x: number }
    // const p: Point = { x: 1 };
    // p;
    let mut arena = NodeArena::new("point.ts");
    let x_name = arena.add_identifier("x");
    let number = arena.add_token(SyntaxKind::NumberKeyword);
    let x_decl = arena.property_member(SyntaxKind::PropertySignature, x_name, number);
    let point_name = arena.add_identifier("Point");
    let point_decl = arena.interface_declaration(point_name, &[], &[x_decl]);

    let annotation_name = arena.add_identifier("Point");
    let annotation = arena.type_reference(SyntaxKind::TypeReference, annotation_name, &[]);
    let one = arena.add_numeric_literal(1.0);
    let x_init = arena.property_assignment("x", one);
    let literal = arena.literal_expression(SyntaxKind::ObjectLiteralExpression, &[x_init]);
    let p_name = arena.add_identifier("p");
    let p_decl = arena.var_declaration(p_name, annotation, literal);
    arena.var_statement(NodeFlags::CONST, &[p_decl]);
    let usage = arena.add_identifier("p");
    arena.wrap_expression(SyntaxKind::ExpressionStatement, usage);

    let mut host = MemoryHost::new(arena);
    let x = host.property("x", TypeId::NUMBER, x_decl);
    let point = host.declare("Point", SymbolFlags::INTERFACE, &[point_decl]);
    let point_type = host.add_named_type(
        TypeData::Object(ObjectShape {
            properties: vec![x],
            flags: ObjectFlags::INTERFACE,
            ..ObjectShape::default()
        }),
        point,
    );
    host.bind(annotation_name, point);
    host.set_type(annotation, point_type);
    let literal_x = host.property("x", TypeId::NUMBER, x_init);
    let literal_type = host.object_type(vec![literal_x]);
    host.set_type(literal, literal_type);
    let p = host.declare("p", SymbolFlags::VARIABLE, &[p_decl]);
    host.set_symbol_type(p, point_type);
    host.bind(usage, p);

    let from_usage = resolved(&host, usage);
    assert_eq!(from_usage.symbol, Some(point));
    assert_eq!(from_usage.declaration, point_decl);
    assert_eq!(from_usage.type_id(&host), point_type);

    let from_declaration = resolved(&host, p_decl);
    assert_eq!(from_declaration.declaration, point_decl);
}

#[test]
fn destructured_binding_resolves_to_the_property_signature() {
    // declare const obj: { a: string };
    // const { a } = obj;
    let mut arena = NodeArena::new("destructure.ts");
    let a_name = arena.add_identifier("a");
    let string = arena.add_token(SyntaxKind::StringKeyword);
    let a_signature = arena.property_member(SyntaxKind::PropertySignature, a_name, string);
    let obj_name = arena.add_identifier("obj");
    let obj_decl = arena.var_declaration(obj_name, NodeIndex::NONE, NodeIndex::NONE);
    arena.var_statement(NodeFlags::CONST, &[obj_decl]);
    let bound = arena.add_identifier("a");
    let element = arena.binding_element(NodeIndex::NONE, bound);
    let pattern = arena.binding_pattern(SyntaxKind::ObjectBindingPattern, &[element]);
    let source = arena.add_identifier("obj");
    let decl = arena.var_declaration(pattern, NodeIndex::NONE, source);
    arena.var_statement(NodeFlags::CONST, &[decl]);

    let mut host = MemoryHost::new(arena);
    let a = host.property("a", TypeId::STRING, a_signature);
    let obj_type = host.object_type(vec![a]);
    let obj = host.declare("obj", SymbolFlags::VARIABLE, &[obj_decl]);
    host.set_symbol_type(obj, obj_type);
    host.bind(source, obj);

    let def = resolved(&host, element);
    assert_eq!(def.symbol, Some(a));
    assert_eq!(def.declaration, a_signature);
    assert_ne!(def.declaration, element);
    assert_eq!(resolved(&host, bound).declaration, a_signature);
}

#[test]
fn literal_number_unions_are_not_widened() {
    let arena = NodeArena::new("union.ts");
    let mut host = MemoryHost::new(arena);
    let members = vec![
        host.number_literal(1.0),
        host.number_literal(2.0),
        host.number_literal(3.0),
    ];
    let union = host.union(members);

    let schema = evaluate_type_schema(&host, union, SchemaOptions::default()).expect("evaluates");
    assert!(schema.definitions.is_empty());
    assert_eq!(
        schema.root.kind,
        SchemaKind::Union {
            items: vec![
                SchemaNode::number(1.0),
                SchemaNode::number(2.0),
                SchemaNode::number(3.0),
            ]
        }
    );
    let json = serde_json::to_value(&schema.root).expect("serializes");
    assert_eq!(json["kind"], "union");
    assert_eq!(json["items"].as_array().map(Vec::len), Some(3));
}

#[test]
fn template_literal_types_expand_to_the_cross_product() {
    // `${"get" | "set"}-${"a" | "b"}`
    let arena = NodeArena::new("template.ts");
    let mut host = MemoryHost::new(arena);
    let verbs = vec![host.string_literal("get"), host.string_literal("set")];
    let verbs = host.union(verbs);
    let names = vec![host.string_literal("a"), host.string_literal("b")];
    let names = host.union(names);
    let template = host.intern(TypeData::TemplateLiteral(vec![
        TemplateSpan::Type(verbs),
        TemplateSpan::Text("-".to_string()),
        TemplateSpan::Type(names),
    ]));

    let schema =
        evaluate_type_schema(&host, template, SchemaOptions::default()).expect("evaluates");
    let expected: Vec<SchemaNode> = ["get-a", "get-b", "set-a", "set-b"]
        .into_iter()
        .map(SchemaNode::string)
        .collect();
    assert_eq!(schema.root.kind, SchemaKind::Union { items: expected });
}

#[test]
fn named_object_intersections_merge_their_properties() {
    // interface A { a: string; shared: string }
    // interface B { b: number; shared: "x" }
    // A & B
    let arena = NodeArena::new("intersection.ts");
    let mut host = MemoryHost::new(arena);
    let interface = |host: &mut MemoryHost, name: &str, properties: Vec<(&str, TypeId)>| {
        let symbol = host.declare(name, SymbolFlags::INTERFACE, &[]);
        let properties = properties
            .into_iter()
            .map(|(name, ty)| host.property(name, ty, NodeIndex::NONE))
            .collect();
        host.add_named_type(
            TypeData::Object(ObjectShape {
                properties,
                flags: ObjectFlags::INTERFACE,
                ..ObjectShape::default()
            }),
            symbol,
        )
    };
    let a = interface(&mut host, "A", vec![("a", TypeId::STRING), ("shared", TypeId::STRING)]);
    let x = host.string_literal("x");
    let b = interface(&mut host, "B", vec![("b", TypeId::NUMBER), ("shared", x)]);
    let both = host.intern(TypeData::Intersection(vec![a, b]));

    let schema = evaluate_type_schema(&host, both, SchemaOptions::default()).expect("evaluates");
    assert!(schema.definitions.is_empty());
    let SchemaKind::Object { properties, .. } = &schema.root.kind else {
        panic!("expected one merged object, got {:?}", schema.root);
    };
    let mut names: Vec<&str> = properties.keys().map(String::as_str).collect();
    names.sort_unstable();
    assert_eq!(names, ["a", "b", "shared"]);
    assert!(properties["a"].is_primitive(IntrinsicKind::String));
    assert!(properties["b"].is_primitive(IntrinsicKind::Number));
    assert_eq!(properties["shared"].kind, SchemaNode::string("x").kind);
}

#[test]
fn call_sites_fold_their_arguments() {
    // function foo(a: number) { return a }
    // foo(2); foo(1 + 1);
    let mut arena = NodeArena::new("calls.ts");
    let a_name = arena.add_identifier("a");
    let number = arena.add_token(SyntaxKind::NumberKeyword);
    let param = arena.parameter(a_name, number);
    let read = arena.add_identifier("a");
    let foo = function(&mut arena, "foo", param, &[], read);
    let two = arena.add_numeric_literal(2.0);
    let first_callee = arena.add_identifier("foo");
    let first = arena.call(SyntaxKind::CallExpression, first_callee, &[two]);
    let one = arena.add_numeric_literal(1.0);
    let other_one = arena.add_numeric_literal(1.0);
    let sum = arena.binary(one, TokenKind::Plus, other_one);
    let second_callee = arena.add_identifier("foo");
    let second = arena.call(SyntaxKind::CallExpression, second_callee, &[sum]);

    let mut host = MemoryHost::new(arena);
    let foo_symbol = host.declare("foo", SymbolFlags::FUNCTION, &[foo]);
    let a = host.declare("a", SymbolFlags::PARAMETER, &[param]);
    host.set_symbol_type(a, TypeId::NUMBER);
    host.bind(read, a);
    host.bind(first_callee, foo_symbol);
    host.bind(second_callee, foo_symbol);

    let evaluator = SchemaEvaluator::new(&host, ResolveOptions::default());
    let cx = CallContext::new(&host, SchemaOptions::default());
    let calls = load_calls(&evaluator, foo_symbol, &cx).expect("loads");

    let sites: Vec<NodeIndex> = calls.iter().map(|info| info.call).collect();
    assert_eq!(sites, vec![first, second]);
    for info in &calls {
        assert_eq!(info.arguments, vec![SchemaNode::number(2.0)]);
        assert_eq!(info.arguments[0].as_literal(), Some(&LiteralValue::number(2.0)));
        assert_eq!(info.return_schema, SchemaNode::number(2.0));
    }
}

#[test]
fn closure_reads_stay_open_until_the_call_binds_them() {
    // function outer(x) {
    //   function inner() { return x + 1 }
    //   return inner();
    // }
    // outer(1);
    let mut arena = NodeArena::new("closure.ts");
    let x_name = arena.add_identifier("x");
    let x_param = arena.parameter(x_name, NodeIndex::NONE);
    let x_read = arena.add_identifier("x");
    let one = arena.add_numeric_literal(1.0);
    let sum = arena.binary(x_read, TokenKind::Plus, one);
    let inner_ret = arena.return_statement(sum);
    let inner_block = arena.block(&[inner_ret]);
    let inner_name = arena.add_identifier("inner");
    let inner = arena.function_like(
        SyntaxKind::FunctionDeclaration,
        inner_name,
        &[],
        NodeIndex::NONE,
        inner_block,
    );
    let inner_callee = arena.add_identifier("inner");
    let inner_call = arena.call(SyntaxKind::CallExpression, inner_callee, &[]);
    let outer = function(&mut arena, "outer", x_param, &[inner], inner_call);
    let argument = arena.add_numeric_literal(1.0);
    let outer_callee = arena.add_identifier("outer");
    let outer_call = arena.call(SyntaxKind::CallExpression, outer_callee, &[argument]);

    let mut host = MemoryHost::new(arena);
    let outer_symbol = host.declare("outer", SymbolFlags::FUNCTION, &[outer]);
    let inner_symbol = host.declare("inner", SymbolFlags::FUNCTION, &[inner]);
    let x = host.declare("x", SymbolFlags::PARAMETER, &[x_param]);
    host.bind(x_read, x);
    host.bind(inner_callee, inner_symbol);
    host.bind(outer_callee, outer_symbol);

    // Outside any call: the result depends on `x`.
    let open = evaluate_schema(&host, inner_call, SchemaOptions::default().late_bound())
        .expect("evaluates")
        .expect("has a value");
    assert!(!open.root.is_concrete());
    assert_eq!(open.root.unbound_parameters(), vec![x_param]);

    // Inside `outer(1)`: concrete.
    let evaluator = SchemaEvaluator::new(&host, ResolveOptions::default());
    let cx = CallContext::new(&host, SchemaOptions::default());
    let calls = load_calls(&evaluator, outer_symbol, &cx).expect("loads");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].call, outer_call);
    assert_eq!(calls[0].return_schema, SchemaNode::number(2.0));
    assert!(calls[0].return_schema.is_concrete());
}
