use super::*;
use tshape_ast::{NodeArena, TokenKind};
use tshape_common::limits::TEMPLATE_LITERAL_EXPANSION_LIMIT;
use tshape_host::{IntrinsicKind, MemoryHost, SymbolFlags};
use tshape_resolver::ResolveOptions;

/// `function name(param) { return <body(read)>; }`.
struct Function {
    node: NodeIndex,
    param: NodeIndex,
    read: NodeIndex,
}

fn function(
    arena: &mut NodeArena,
    name: &str,
    param_name: &str,
    body: impl FnOnce(&mut NodeArena, NodeIndex) -> NodeIndex,
) -> Function {
    let param_ident = arena.add_identifier(param_name);
    let param = arena.parameter(param_ident, NodeIndex::NONE);
    let read = arena.add_identifier(param_name);
    let value = body(arena, read);
    let ret = arena.return_statement(value);
    let block = arena.block(&[ret]);
    let ident = arena.add_identifier(name);
    let node = arena.function_like(
        SyntaxKind::FunctionDeclaration,
        ident,
        &[param],
        NodeIndex::NONE,
        block,
    );
    Function { node, param, read }
}

fn declare_function(host: &mut MemoryHost, name: &str, param_name: &str, f: &Function) -> SymbolId {
    let symbol = host.declare(name, SymbolFlags::FUNCTION, &[f.node]);
    let param = host.declare(param_name, SymbolFlags::PARAMETER, &[f.param]);
    host.bind(f.read, param);
    symbol
}

fn load(host: &MemoryHost, symbol: SymbolId) -> Vec<CallInfo> {
    let evaluator = SchemaEvaluator::new(host, ResolveOptions::default());
    let cx = CallContext::new(host, SchemaOptions::default());
    load_calls(&evaluator, symbol, &cx).expect("calls load")
}

fn call_with(arena: &mut NodeArena, callee_name: &str, arguments: &[NodeIndex]) -> (NodeIndex, NodeIndex) {
    let callee = arena.add_identifier(callee_name);
    let call = arena.call(SyntaxKind::CallExpression, callee, arguments);
    (call, callee)
}

#[test]
fn index_groups_calls_by_callee() {
    let mut arena = NodeArena::new("test.ts");
    let (first, first_callee) = call_with(&mut arena, "f", &[]);
    let (second, second_callee) = call_with(&mut arena, "f", &[]);
    let object = arena.add_identifier("obj");
    let access = arena.property_access(object, "run");
    let method_call = arena.call(SyntaxKind::CallExpression, access, &[]);
    let method_name = arena
        .get(access)
        .and_then(|n| arena.get_access_expr(n))
        .map(|a| a.name_or_argument)
        .unwrap_or_default();
    let mut host = MemoryHost::new(arena);
    let f = host.declare("f", SymbolFlags::FUNCTION, &[]);
    let run = host.declare("run", SymbolFlags::METHOD, &[]);
    host.bind(first_callee, f);
    host.bind(second_callee, f);
    host.bind(method_name, run);

    let index = CallSiteIndex::build(&host);
    assert_eq!(index.calls_of(f), &[first, second]);
    assert_eq!(index.calls_of(run), &[method_call]);
    assert_eq!(index.len(), 3);
    assert!(index.calls_of(SymbolId(99)).is_empty());
}

#[test]
fn arguments_fold_to_constants() {
    // function foo(a) { return a } foo(2); foo(1 + 1);
    let mut arena = NodeArena::new("test.ts");
    let foo = function(&mut arena, "foo", "a", |_, read| read);
    let two = arena.add_numeric_literal(2.0);
    let (_, first_callee) = call_with(&mut arena, "foo", &[two]);
    let one = arena.add_numeric_literal(1.0);
    let other_one = arena.add_numeric_literal(1.0);
    let sum = arena.binary(one, TokenKind::Plus, other_one);
    let (_, second_callee) = call_with(&mut arena, "foo", &[sum]);
    let mut host = MemoryHost::new(arena);
    let symbol = declare_function(&mut host, "foo", "a", &foo);
    host.bind(first_callee, symbol);
    host.bind(second_callee, symbol);

    let calls = load(&host, symbol);
    assert_eq!(calls.len(), 2);
    for info in &calls {
        assert_eq!(info.arguments, vec![SchemaNode::number(2.0)]);
        assert_eq!(info.return_schema, SchemaNode::number(2.0));
    }
}

#[test]
fn caller_parameters_are_rebound_through_the_callers_calls() {
    // function inner(y) { return y + 1 }
    // function outer(x) { return inner(x) }
    // outer(1); outer(2);
    let mut arena = NodeArena::new("test.ts");
    let inner = function(&mut arena, "inner", "y", |arena, read| {
        let one = arena.add_numeric_literal(1.0);
        arena.binary(read, TokenKind::Plus, one)
    });
    let mut inner_callee = NodeIndex::NONE;
    let outer = function(&mut arena, "outer", "x", |arena, read| {
        let (call, callee) = call_with(arena, "inner", &[read]);
        inner_callee = callee;
        call
    });
    let one = arena.add_numeric_literal(1.0);
    let (_, first_callee) = call_with(&mut arena, "outer", &[one]);
    let two = arena.add_numeric_literal(2.0);
    let (_, second_callee) = call_with(&mut arena, "outer", &[two]);
    let mut host = MemoryHost::new(arena);
    let inner_symbol = declare_function(&mut host, "inner", "y", &inner);
    let outer_symbol = declare_function(&mut host, "outer", "x", &outer);
    host.bind(inner_callee, inner_symbol);
    host.bind(first_callee, outer_symbol);
    host.bind(second_callee, outer_symbol);

    let calls = load(&host, inner_symbol);
    let arguments: Vec<&[SchemaNode]> = calls.iter().map(|c| c.arguments.as_slice()).collect();
    assert_eq!(
        arguments,
        vec![&[SchemaNode::number(1.0)][..], &[SchemaNode::number(2.0)][..]]
    );
    let returns: Vec<&SchemaNode> = calls.iter().map(|c| &c.return_schema).collect();
    assert_eq!(returns, vec![&SchemaNode::number(2.0), &SchemaNode::number(3.0)]);
}

#[test]
fn uncalled_callers_leave_arguments_open() {
    // function inner(y) { return y } function outer(x) { return inner(x) }
    let mut arena = NodeArena::new("test.ts");
    let inner = function(&mut arena, "inner", "y", |_, read| read);
    let mut inner_callee = NodeIndex::NONE;
    let outer = function(&mut arena, "outer", "x", |arena, read| {
        let (call, callee) = call_with(arena, "inner", &[read]);
        inner_callee = callee;
        call
    });
    let mut host = MemoryHost::new(arena);
    let inner_symbol = declare_function(&mut host, "inner", "y", &inner);
    declare_function(&mut host, "outer", "x", &outer);
    host.bind(inner_callee, inner_symbol);

    let calls = load(&host, inner_symbol);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].arguments[0].is_unbound());
    assert_eq!(calls[0].arguments[0].node, outer.param);
    assert_eq!(calls[0].return_schema.unbound_parameters(), vec![outer.param]);
}

#[test]
fn self_calls_terminate() {
    // function f(n) { return f(n) } f(1);
    let mut arena = NodeArena::new("test.ts");
    let mut inner_callee = NodeIndex::NONE;
    let f = function(&mut arena, "f", "n", |arena, read| {
        let (call, callee) = call_with(arena, "f", &[read]);
        inner_callee = callee;
        call
    });
    let one = arena.add_numeric_literal(1.0);
    let (outer_call, outer_callee) = call_with(&mut arena, "f", &[one]);
    let mut host = MemoryHost::new(arena);
    let symbol = declare_function(&mut host, "f", "n", &f);
    host.bind(inner_callee, symbol);
    host.bind(outer_callee, symbol);

    let calls = load(&host, symbol);
    assert_eq!(calls.len(), 2);
    let outer = calls
        .iter()
        .find(|info| info.call == outer_call)
        .expect("outer call loaded");
    assert_eq!(outer.arguments, vec![SchemaNode::number(1.0)]);
}

#[test]
fn calls_with_the_wrong_arity_are_skipped() {
    let mut arena = NodeArena::new("test.ts");
    let foo = function(&mut arena, "foo", "a", |_, read| read);
    let (_, callee) = call_with(&mut arena, "foo", &[]);
    let mut host = MemoryHost::new(arena);
    let symbol = declare_function(&mut host, "foo", "a", &foo);
    host.bind(callee, symbol);

    assert!(load(&host, symbol).is_empty());
}

#[test]
fn non_functions_have_no_calls() {
    let mut arena = NodeArena::new("test.ts");
    let one = arena.add_numeric_literal(1.0);
    let decl = arena.const_declaration("value", one);
    let mut host = MemoryHost::new(arena);
    let symbol = host.declare("value", SymbolFlags::VARIABLE, &[decl]);

    assert!(load(&host, symbol).is_empty());
}

#[test]
fn substitution_refolds_open_schemas() {
    let param = NodeIndex(7);
    let open = algebra::fold_binary(
        TokenKind::Plus,
        SchemaNode::unbound_parameter(param),
        SchemaNode::number(1.0),
    );
    assert!(matches!(open.kind, SchemaKind::BinaryExpression { .. }));

    let bindings: FxHashMap<NodeIndex, SchemaNode> =
        [(param, SchemaNode::number(2.0))].into_iter().collect();
    assert_eq!(
        resolve_parameters_in_schema(&open, &bindings, &SchemaOptions::default()),
        SchemaNode::number(3.0)
    );

    let template = algebra::fold_template(
        vec![
            crate::schema::TemplatePart::Text("id-".to_string()),
            crate::schema::TemplatePart::Schema(SchemaNode::unbound_parameter(param)),
        ],
        TEMPLATE_LITERAL_EXPANSION_LIMIT,
    );
    let choices: FxHashMap<NodeIndex, SchemaNode> = [(
        param,
        algebra::union([SchemaNode::string("a"), SchemaNode::string("b")]),
    )]
    .into_iter()
    .collect();
    assert_eq!(
        resolve_parameters_in_schema(&template, &choices, &SchemaOptions::default()),
        algebra::union([SchemaNode::string("id-a"), SchemaNode::string("id-b")])
    );
}

#[test]
fn substitution_keeps_unrelated_parameters_open() {
    let bound = NodeIndex(7);
    let other = NodeIndex(8);
    let schema = SchemaNode::array(SchemaNode::unbound_parameter(other));
    let bindings: FxHashMap<NodeIndex, SchemaNode> =
        [(bound, SchemaNode::primitive(IntrinsicKind::String))].into_iter().collect();
    assert_eq!(
        resolve_parameters_in_schema(&schema, &bindings, &SchemaOptions::default()),
        schema
    );
}

#[test]
fn substitution_respects_the_template_expansion_limit() {
    let param = NodeIndex(7);
    let template = SchemaNode::new(SchemaKind::TemplateLiteral {
        parts: vec![
            crate::schema::TemplatePart::Text("id-".to_string()),
            crate::schema::TemplatePart::Schema(SchemaNode::unbound_parameter(param)),
        ],
    });
    let choices: FxHashMap<NodeIndex, SchemaNode> = [(
        param,
        algebra::union([
            SchemaNode::string("a"),
            SchemaNode::string("b"),
            SchemaNode::string("c"),
        ]),
    )]
    .into_iter()
    .collect();

    let narrow = SchemaOptions {
        template_expansion_limit: 2,
        ..SchemaOptions::default()
    };
    let kept = resolve_parameters_in_schema(&template, &choices, &narrow);
    match &kept.kind {
        SchemaKind::TemplateLiteral { parts } => assert_eq!(parts.len(), 2),
        other => panic!("expected a template literal, got {other:?}"),
    }
    assert!(kept.references().is_empty());

    let expanded = resolve_parameters_in_schema(&template, &choices, &SchemaOptions::default());
    assert_eq!(
        expanded,
        algebra::union([
            SchemaNode::string("id-a"),
            SchemaNode::string("id-b"),
            SchemaNode::string("id-c"),
        ])
    );
}
