use super::*;

#[test]
fn at_node_wraps_once() {
    let mut arena = NodeArena::new("wrap.ts");
    let ident = arena.add_identifier("value");
    let outer = arena.add_identifier("other");

    let error = ShapeError::InvariantViolation("broken".into()).at_node(&arena, ident, "a -> b");
    let wrapped_again = error.at_node(&arena, outer, "");

    let node_error = wrapped_again.node_error().expect("node error");
    assert_eq!(node_error.node, ident);
    assert_eq!(node_error.node_kind, SyntaxKind::Identifier);
    assert_eq!(node_error.excerpt, "value");
    assert_eq!(node_error.history, "a -> b");
    assert!(matches!(
        wrapped_again.root_cause(),
        ShapeError::InvariantViolation(msg) if msg == "broken"
    ));
}

#[test]
fn display_includes_location_and_cause() {
    let mut arena = NodeArena::new("show.ts");
    let ident = arena.add_identifier("x");
    let error = ShapeError::unexpected("identifier", SyntaxKind::Block).at_node(&arena, ident, "");
    let text = error.to_string();
    assert!(text.starts_with("Identifier at show.ts:1:1 `x`"), "{text}");
    assert!(text.contains("expected identifier payload, found Block"), "{text}");
    assert!(!text.contains("trace:"));
}

#[test]
fn excerpts_are_single_line_and_bounded() {
    assert_eq!(excerpt("first\nsecond"), "first");
    let long = "x".repeat(200);
    let cut = excerpt(&long);
    assert_eq!(cut.chars().count(), ERROR_EXCERPT_CHARS + 3);
    assert!(cut.ends_with("..."));
}

#[test]
fn source_chain_reaches_the_cause() {
    use std::error::Error as _;
    let mut arena = NodeArena::new("chain.ts");
    let ident = arena.add_identifier("x");
    let error = ShapeError::MissingDeclaration { symbol: SymbolId(3) }.at_node(&arena, ident, "");
    let node_error = error.node_error().expect("node error");
    let source = node_error.source().expect("source");
    assert_eq!(source.to_string(), "symbol S3 resolves to a target without a declaration");
}
