use super::*;
use tshape_host::IntrinsicKind;

#[test]
fn descend_spends_depth_and_restart_restores_it() {
    let ctx = SchemaContext::new(SchemaOptions::default().with_max_depth(2));
    let child = ctx.descend("a").descend("b");
    assert!(child.is_exhausted());
    assert_eq!(child.descend("c").depth(), 0);
    assert_eq!(child.restart("deferred").depth(), 2);
}

#[test]
fn unwrap_keeps_depth_and_records_history() {
    let ctx = SchemaContext::new(SchemaOptions::default());
    let child = ctx.unwrap_into("parenthesized").descend("property a");
    assert_eq!(child.history(), "parenthesized > property a");
    assert_eq!(child.depth(), ctx.depth() - 1);
}

#[test]
fn bindings_are_private_to_the_branch() {
    let ctx = SchemaContext::new(SchemaOptions::default());
    let param = NodeIndex(3);
    let bound = ctx.with_bindings([(param, SchemaNode::number(1.0))]);
    assert_eq!(bound.binding(param), Some(&SchemaNode::number(1.0)));
    assert!(ctx.binding(param).is_none());
    assert!(bound.shares_tables_with(&ctx));

    let rebound = bound.with_bindings([(param, SchemaNode::number(2.0))]);
    assert_eq!(rebound.binding(param), Some(&SchemaNode::number(2.0)));
}

#[test]
fn tables_are_shared_between_branches() {
    let ctx = SchemaContext::new(SchemaOptions::default());
    let left = ctx.descend("left");
    let right = ctx.descend("right");
    let key = DefinitionKey::Type(TypeId(200));

    left.set_definition(key, DefinitionCell::NotStarted { ty: TypeId(200) });
    assert!(right.has_definition(key));
    assert_eq!(right.next_deferred(), Some((key, TypeId(200))));

    right.set_definition(key, DefinitionCell::Done(SchemaNode::unknown()));
    assert_eq!(ctx.next_deferred(), None);

    let unrelated = SchemaContext::new(SchemaOptions::default());
    assert!(!unrelated.has_definition(key));
}

#[test]
fn type_cache_skips_depth_limited_schemas() {
    let ctx = SchemaContext::new(SchemaOptions::default());
    ctx.cache_type(TypeId(150), &SchemaNode::primitive(IntrinsicKind::String));
    ctx.cache_type(TypeId(151), &SchemaNode::array(SchemaNode::recursion_limit()));
    assert!(ctx.cached_type(TypeId(150)).is_some());
    assert!(ctx.cached_type(TypeId(151)).is_none());
}

#[test]
fn symbol_guard_rejects_reentry() {
    let ctx = SchemaContext::new(SchemaOptions::default());
    let symbol = SymbolId(9);
    assert!(ctx.enter_symbol(symbol));
    assert!(!ctx.descend("call").enter_symbol(symbol));
    assert!(ctx.is_handling(symbol));
    assert_eq!(ctx.handled_symbols(), 1);
    ctx.leave_symbol(symbol);
    assert!(!ctx.is_handling(symbol));
}

#[test]
fn type_guard_detects_cycles() {
    let ctx = SchemaContext::new(SchemaOptions::default());
    assert!(ctx.enter_type(TypeId(130)).is_entered());
    assert!(ctx.enter_type(TypeId(130)).is_cycle());
    ctx.leave_type(TypeId(130));
}
