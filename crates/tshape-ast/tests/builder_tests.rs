use super::*;
use crate::NodeFlags;

#[test]
fn const_declaration_sits_in_a_const_list() {
    let mut arena = NodeArena::new("test.ts");
    let value = arena.add_numeric_literal(1.0);
    let decl = arena.const_declaration("one", value);

    let list = arena.parent_of(decl);
    let statement = arena.parent_of(list);
    assert_eq!(arena.kind(list), Some(SyntaxKind::VariableDeclarationList));
    assert_eq!(arena.kind(statement), Some(SyntaxKind::VariableStatement));
    assert!(arena.is_const_declaration(decl));
    assert_eq!(arena.name_text(arena.name_of(decl)), Some("one"));
    assert_eq!(arena.initializer_of(decl), value);
}

#[test]
fn property_access_links_name_and_object() {
    let mut arena = NodeArena::new("test.ts");
    let object = arena.add_identifier("config");
    let access = arena.property_access(object, "port");
    let node = arena.get(access).expect("access");
    let data = arena.get_access_expr(node).expect("payload");

    assert_eq!(data.expression, object);
    assert_eq!(arena.name_text(data.name_or_argument), Some("port"));
    assert_eq!(arena.parent_of(data.name_or_argument), access);
    assert_eq!(arena.node_text(access), "config port");
}

#[test]
fn template_expression_ends_with_a_tail() {
    let mut arena = NodeArena::new("test.ts");
    let a = arena.add_identifier("a");
    let b = arena.add_identifier("b");
    let template = arena.template_expression("x-", &[(a, "-"), (b, "")]);
    let node = arena.get(template).expect("template");
    let data = arena.get_template_expr(node).expect("payload");

    assert_eq!(data.template_spans.len(), 2);
    let kinds: Vec<_> = data
        .template_spans
        .iter()
        .filter_map(|span| {
            let span = arena.get_template_span(arena.get(span)?)?;
            arena.kind(span.literal)
        })
        .collect();
    assert_eq!(kinds, vec![SyntaxKind::TemplateMiddle, SyntaxKind::TemplateTail]);
}

#[test]
fn as_const_is_flagged() {
    let mut arena = NodeArena::new("test.ts");
    let value = arena.add_string_literal("on");
    let assertion = arena.as_const(value);
    let node = arena.get(assertion).expect("assertion");
    assert!(node.flags.contains(NodeFlags::CONST_ASSERTION));
    assert_eq!(node.kind, SyntaxKind::AsExpression);
}

#[test]
fn module_declaration_without_specifier() {
    let mut arena = NodeArena::new("test.ts");
    let local = arena.add_identifier("local");
    let specifier = arena.specifier(SyntaxKind::ExportSpecifier, NodeIndex::NONE, local);
    let named = arena.named_bindings(SyntaxKind::NamedExports, &[specifier]);
    let decl = arena.module_declaration(SyntaxKind::ExportDeclaration, named, "");
    let data = arena
        .get(decl)
        .and_then(|n| arena.get_import_decl(n))
        .expect("payload");
    assert!(data.module_specifier.is_none());
    assert_eq!(arena.parent_of(specifier), named);
}
