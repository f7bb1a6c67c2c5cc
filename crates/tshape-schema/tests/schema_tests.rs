use super::*;

fn object(properties: &[(&str, SchemaNode)]) -> SchemaNode {
    SchemaNode::object(
        properties
            .iter()
            .map(|(name, schema)| ((*name).to_string(), schema.clone()))
            .collect(),
    )
}

#[test]
fn unbound_parameters_are_open() {
    let param = NodeIndex(4);
    let schema = SchemaNode::array(SchemaNode::unbound_parameter(param));
    assert!(!schema.is_concrete());
    assert!(schema.has_unbound());
    assert_eq!(schema.unbound_parameters(), vec![param]);
    assert_eq!(schema.open_leaf_count(), 1);
}

#[test]
fn plain_unknown_is_concrete() {
    let schema = object(&[("a", SchemaNode::unknown())]);
    assert!(schema.is_concrete());
    assert!(!schema.has_unbound());
    assert_eq!(schema.open_leaf_count(), 0);
}

#[test]
fn references_count_every_occurrence() {
    let key = DefinitionKey::Type(TypeId(120));
    let reference = SchemaNode::reference("Node", key, Vec::new());
    let schema = object(&[("left", reference.clone()), ("right", reference)]);
    assert_eq!(schema.references(), vec![key, key]);
    assert!(schema.mentions(key));
    assert!(!schema.mentions(DefinitionKey::RecursionLimit));
}

#[test]
fn inline_reference_replaces_only_the_first_occurrence() {
    let key = DefinitionKey::Type(TypeId(120));
    let reference = SchemaNode::reference("Box", key, Vec::new()).with_flags(SchemaFlags::OPTIONAL);
    let mut schema = object(&[("a", reference.clone()), ("b", reference)]);
    assert!(schema.inline_reference(key, &SchemaNode::primitive(IntrinsicKind::Number)));

    let SchemaKind::Object { properties, .. } = &schema.kind else {
        panic!("expected object, got {schema:?}");
    };
    assert!(properties["a"].is_primitive(IntrinsicKind::Number));
    assert!(properties["a"].flags.contains(SchemaFlags::OPTIONAL));
    assert_eq!(properties["b"].reference_key(), Some(key));
}

#[test]
fn truthiness_of_literals_and_unions() {
    assert_eq!(SchemaNode::string("").truthiness(), Some(false));
    assert_eq!(SchemaNode::string("x").truthiness(), Some(true));
    assert_eq!(SchemaNode::number(0.0).truthiness(), Some(false));
    assert_eq!(SchemaNode::number(f64::NAN).truthiness(), Some(false));
    assert_eq!(SchemaNode::primitive(IntrinsicKind::Null).truthiness(), Some(false));
    assert_eq!(SchemaNode::array(SchemaNode::unknown()).truthiness(), Some(true));
    assert_eq!(SchemaNode::primitive(IntrinsicKind::Number).truthiness(), None);

    let falsy = SchemaNode::new(SchemaKind::Union {
        items: vec![SchemaNode::number(0.0), SchemaNode::string("")],
    });
    assert_eq!(falsy.truthiness(), Some(false));
    let mixed = SchemaNode::new(SchemaKind::Union {
        items: vec![SchemaNode::number(0.0), SchemaNode::number(1.0)],
    });
    assert_eq!(mixed.truthiness(), None);
}

#[test]
fn serializes_with_a_kind_tag() {
    let schema = object(&[(
        "id",
        SchemaNode::primitive(IntrinsicKind::Number).with_flags(SchemaFlags::READONLY),
    )]);
    let json = serde_json::to_value(&schema).expect("serialize");
    assert_eq!(json["kind"], "object");
    assert_eq!(json["properties"]["id"]["kind"], "primitive");
    assert!(json.get("node").is_none());
    assert!(json["properties"]["id"].get("flags").is_some());
}

#[test]
fn definition_keys_print_as_type_names() {
    assert_eq!(DefinitionKey::Type(TypeId(101)).to_string(), "T101");
    assert_eq!(DefinitionKey::RecursionLimit.to_string(), RECURSION_LIMIT_NAME);
    let json = serde_json::to_value(DefinitionKey::RecursionLimit).expect("serialize");
    assert_eq!(json, "TooMuchRecursion");
}
