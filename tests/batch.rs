//! Batch runs: configuration loading, per-node outcomes and failure isolation.

use std::fs;
use tshape::ast::{NodeArena, NodeData, NodeIndex, SyntaxKind};
use tshape::host::SymbolFlags;
use tshape::{
    AnalysisConfig, BatchSummary, MemoryHost, NodeOutcome, ResolveOptions, SchemaNode,
    SchemaOptions, evaluate_schemas, evaluate_schemas_with, resolve_declarations,
};

struct Program {
    host: MemoryHost,
    good: NodeIndex,
    empty: NodeIndex,
    broken: NodeIndex,
}

/// `const answer = 42;`, an empty block, and a binary expression without
/// operands.
fn program() -> Program {
    let mut arena = NodeArena::new("batch.ts");
    let value = arena.add_numeric_literal(42.0);
    let good = arena.const_declaration("answer", value);
    let empty = arena.block(&[]);
    let broken = arena.add_node(SyntaxKind::BinaryExpression, NodeData::None);
    let mut host = MemoryHost::new(arena);
    host.declare("answer", SymbolFlags::VARIABLE, &[good]);
    Program {
        host,
        good,
        empty,
        broken,
    }
}

#[test]
fn one_failure_does_not_stop_the_run() {
    let program = program();
    let nodes = [program.broken, program.good, program.empty];
    let report = evaluate_schemas(&program.host, &nodes, SchemaOptions::default());

    assert_eq!(
        report.summary,
        BatchSummary {
            total: 3,
            done: 1,
            empty: 1,
            failed: 1,
        }
    );
    let order: Vec<NodeIndex> = report.outcomes.iter().map(NodeOutcome::node).collect();
    assert_eq!(order, nodes);

    let done = report.outcomes[1].value().expect("schema");
    assert_eq!(done.root.kind, SchemaNode::number(42.0).kind);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    match failures[0] {
        NodeOutcome::Failed { node, message } => {
            assert_eq!(*node, program.broken);
            assert!(message.contains("batch.ts"), "{message}");
            assert!(message.contains("binary expression"), "{message}");
        }
        other => panic!("expected a failure, got {other:?}"),
    }
}

#[test]
fn configuration_files_drive_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tshape.json");
    fs::write(
        &path,
        r#"{ "resolve": { "chooseLocal": "false" }, "schema": { "maxDepth": 4, "inlineCallBodies": "off" } }"#,
    )
    .expect("writes config");

    let config = AnalysisConfig::from_file(&path).expect("loads");
    assert_eq!(config.schema.max_depth, 4);
    assert!(!config.schema.inline_call_bodies);
    assert!(!config.resolve.choose_local);

    let program = program();
    let report = evaluate_schemas_with(&program.host, &[program.good, program.empty], &config);
    assert_eq!(report.summary.done, 1);
    assert_eq!(report.summary.empty, 1);
    assert_eq!(report.failures().count(), 0);
}

#[test]
fn unreadable_configuration_names_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.json");
    let error = AnalysisConfig::from_file(&missing).expect_err("missing file");
    assert!(format!("{error:#}").contains("missing.json"));

    let malformed = dir.path().join("malformed.json");
    fs::write(&malformed, "{ \"schema\": ").expect("writes config");
    let error = AnalysisConfig::from_file(&malformed).expect_err("malformed file");
    assert!(format!("{error:#}").contains("malformed.json"));
}

#[test]
fn resolution_batches_report_every_node() {
    let mut arena = NodeArena::new("resolve.ts");
    let value = arena.add_string_literal("v");
    let good = arena.const_declaration("value", value);
    let keyword = arena.add_token(SyntaxKind::ImportKeyword);
    let broken = arena.add_node(SyntaxKind::TypeReference, NodeData::None);
    let mut host = MemoryHost::new(arena);
    let symbol = host.declare("value", SymbolFlags::VARIABLE, &[good]);

    let report = resolve_declarations(&host, &[good, keyword, broken], ResolveOptions::default());
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.done, 1);
    assert_eq!(report.summary.empty, 1);
    assert_eq!(report.summary.failed, 1);

    let def = report.outcomes[0]
        .value()
        .and_then(|resolution| resolution.definition())
        .expect("definition");
    assert_eq!(def.symbol, Some(symbol));
    assert!(matches!(report.outcomes[1], NodeOutcome::Empty { .. }));
    assert!(report.outcomes[2].is_failed());

    let json = serde_json::to_value(report.summary).expect("serializes");
    assert_eq!(json["failed"], 1);
}
