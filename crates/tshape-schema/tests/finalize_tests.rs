use super::*;
use crate::options::SchemaOptions;
use crate::schema::{SchemaFlags, SchemaKind};
use tshape_ast::NodeArena;
use tshape_host::{IntrinsicKind, MemoryHost, ObjectFlags, ObjectShape, SymbolFlags, TypeData, TypeId};
use tshape_resolver::ResolveOptions;

const T: DefinitionKey = DefinitionKey::Type(TypeId(200));

fn reference() -> SchemaNode {
    SchemaNode::reference("T", T, Vec::new())
}

fn object(properties: &[(&str, SchemaNode)]) -> SchemaNode {
    SchemaNode::object(
        properties
            .iter()
            .map(|(name, schema)| ((*name).to_string(), schema.clone()))
            .collect(),
    )
}

fn definitions(entries: &[(DefinitionKey, SchemaNode)]) -> IndexMap<DefinitionKey, SchemaNode> {
    entries.iter().cloned().collect()
}

#[test]
fn single_use_definitions_are_inlined() {
    let mut root = object(&[("a", reference().with_flags(SchemaFlags::OPTIONAL))]);
    let mut defs = definitions(&[(T, SchemaNode::primitive(IntrinsicKind::Number))]);
    simplify(&mut root, &mut defs);

    assert!(defs.is_empty());
    assert_eq!(
        root,
        object(&[(
            "a",
            SchemaNode::primitive(IntrinsicKind::Number).with_flags(SchemaFlags::OPTIONAL)
        )])
    );
}

#[test]
fn shared_definitions_stay_named() {
    let mut root = object(&[("a", reference()), ("b", reference())]);
    let mut defs = definitions(&[(T, SchemaNode::primitive(IntrinsicKind::Number))]);
    simplify(&mut root, &mut defs);

    assert_eq!(defs.len(), 1);
    assert_eq!(root.references(), vec![T, T]);
}

#[test]
fn self_referential_definitions_are_never_inlined_into_themselves() {
    let mut root = reference();
    let mut defs = definitions(&[(T, object(&[("next", reference())]))]);
    simplify(&mut root, &mut defs);

    assert_eq!(root, reference());
    assert_eq!(defs.get(&T), Some(&object(&[("next", reference())])));
}

#[test]
fn unreachable_definitions_are_dropped() {
    let mut root = SchemaNode::primitive(IntrinsicKind::String);
    let mut defs = definitions(&[(T, SchemaNode::primitive(IntrinsicKind::Number))]);
    simplify(&mut root, &mut defs);
    assert!(defs.is_empty());
}

#[test]
fn inlining_reaches_a_fixpoint_through_chains() {
    // root -> U (twice) ; U -> T (once)
    let u = DefinitionKey::Type(TypeId(201));
    let u_reference = SchemaNode::reference("U", u, Vec::new());
    let mut root = object(&[("a", u_reference.clone()), ("b", u_reference)]);
    let mut defs = definitions(&[
        (u, SchemaNode::array(reference())),
        (T, SchemaNode::primitive(IntrinsicKind::Boolean)),
    ]);
    simplify(&mut root, &mut defs);

    assert_eq!(defs.len(), 1);
    assert_eq!(
        defs.get(&u),
        Some(&SchemaNode::array(SchemaNode::primitive(IntrinsicKind::Boolean)))
    );
}

#[test]
fn recursion_sentinel_gets_a_definition() {
    let arena = NodeArena::new("test.ts");
    let host = MemoryHost::new(arena);
    let evaluator = SchemaEvaluator::new(&host, ResolveOptions::default());
    let ctx = SchemaContext::new(SchemaOptions::default());

    let schema = finalize(&evaluator, SchemaNode::array(SchemaNode::recursion_limit()), &ctx)
        .expect("finalizes");
    assert_eq!(
        schema.definition(DefinitionKey::RecursionLimit),
        Some(&SchemaNode::unknown())
    );
    assert!(schema.dangling_references().is_empty());
    let json = serde_json::to_value(&schema).expect("serializes");
    assert!(json["definitions"].get("TooMuchRecursion").is_some());
}

#[test]
fn deferred_definitions_are_built_with_a_fresh_budget() {
    let arena = NodeArena::new("test.ts");
    let mut host = MemoryHost::new(arena);
    let point = host.declare("Point", SymbolFlags::INTERFACE, &[]);
    let x = host.property("x", TypeId::NUMBER, tshape_ast::NodeIndex::NONE);
    let point_type = host.add_named_type(
        TypeData::Object(ObjectShape {
            properties: vec![x],
            flags: ObjectFlags::INTERFACE,
            ..ObjectShape::default()
        }),
        point,
    );
    let evaluator = SchemaEvaluator::new(&host, ResolveOptions::default());
    let ctx = SchemaContext::new(SchemaOptions::default().with_max_depth(0));
    let root = evaluator.evaluate_type(point_type, &ctx).expect("evaluates");

    let schema = finalize(&evaluator, root, &ctx).expect("finalizes");
    let key = DefinitionKey::Type(point_type);
    assert_eq!(schema.root.reference_key(), Some(key));
    match schema.definition(key).map(|body| &body.kind) {
        Some(SchemaKind::Object { properties, .. }) => assert!(properties.contains_key("x")),
        other => panic!("expected an object definition, got {other:?}"),
    }
    assert_eq!(schema.reference_count(key), 1);
}

#[test]
fn deferred_definitions_past_the_cap_become_the_sentinel() {
    let arena = NodeArena::new("test.ts");
    let mut host = MemoryHost::new(arena);
    let point = host.declare("Point", SymbolFlags::INTERFACE, &[]);
    let point_type = host.add_named_type(TypeData::Object(ObjectShape::default()), point);
    let evaluator = SchemaEvaluator::new(&host, ResolveOptions::default());
    let options = SchemaOptions {
        max_deferred_definitions: 0,
        ..SchemaOptions::default().with_max_depth(0)
    };
    let ctx = SchemaContext::new(options);
    let root = evaluator.evaluate_type(point_type, &ctx).expect("evaluates");

    let schema = finalize(&evaluator, root, &ctx).expect("finalizes");
    assert_eq!(
        schema.definition(DefinitionKey::Type(point_type)),
        Some(&SchemaNode::recursion_limit())
    );
    assert!(schema.definition(DefinitionKey::RecursionLimit).is_some());
    assert!(schema.dangling_references().is_empty());
}

#[test]
fn definitions_left_building_are_circular() {
    let arena = NodeArena::new("test.ts");
    let host = MemoryHost::new(arena);
    let evaluator = SchemaEvaluator::new(&host, ResolveOptions::default());
    let ctx = SchemaContext::new(SchemaOptions::default());
    ctx.set_definition(T, DefinitionCell::Building);

    let error = finalize(&evaluator, reference(), &ctx).expect_err("cycle bypassed the table");
    assert!(matches!(error, ShapeError::CircularDefinition { .. }));
}
