//! Schema evaluation benchmarks.
//!
//! Measures definition-table growth on recursive type graphs and template
//! literal expansion.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tshape::ast::{NodeArena, NodeIndex};
use tshape::host::{ObjectFlags, ObjectShape, SymbolFlags, TemplateSpan, TypeData};
use tshape::{MemoryHost, SchemaOptions, TypeId, evaluate_type_schema};

/// `interface N0 { next: N1; all: N0[] }` ... `interface Nk { next: N0; all: Nk[] }`
fn interface_ring(size: usize) -> (MemoryHost, TypeId) {
    let mut host = MemoryHost::new(NodeArena::new("ring.ts"));
    let types: Vec<TypeId> = (0..size)
        .map(|i| {
            let symbol = host.declare(&format!("N{i}"), SymbolFlags::INTERFACE, &[]);
            host.add_named_type(TypeData::Object(ObjectShape::default()), symbol)
        })
        .collect();
    for (i, &ty) in types.iter().enumerate() {
        let next = host.property("next", types[(i + 1) % size], NodeIndex::NONE);
        let list = host.intern(TypeData::Array(ty));
        let all = host.property("all", list, NodeIndex::NONE);
        let label = host.string_literal(&format!("n{i}"));
        let tag = host.property("tag", label, NodeIndex::NONE);
        host.set_type_data(
            ty,
            TypeData::Object(ObjectShape {
                properties: vec![next, all, tag],
                flags: ObjectFlags::INTERFACE,
                ..ObjectShape::default()
            }),
        );
    }
    (host, types[0])
}

/// `${"a" | "b" | ...}-${"a" | "b" | ...}` with `width` members per span.
fn template_product(width: usize) -> (MemoryHost, TypeId) {
    let mut host = MemoryHost::new(NodeArena::new("template.ts"));
    let mut span = || {
        let members = (0..width)
            .map(|i| host.string_literal(&format!("m{i}")))
            .collect();
        host.union(members)
    };
    let left = span();
    let right = span();
    let template = host.intern(TypeData::TemplateLiteral(vec![
        TemplateSpan::Type(left),
        TemplateSpan::Text("-".to_string()),
        TemplateSpan::Type(right),
    ]));
    (host, template)
}

fn bench_recursive_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("recursive_types");
    for size in [4, 32, 128] {
        let (host, root) = interface_ring(size);
        for max_depth in [2, 8] {
            let options = SchemaOptions::default().with_max_depth(max_depth);
            group.bench_with_input(
                BenchmarkId::new(format!("ring_{size}"), max_depth),
                &options,
                |b, &options| {
                    b.iter(|| {
                        let schema = evaluate_type_schema(&host, black_box(root), options)
                            .expect("evaluates");
                        black_box(schema.definitions.len())
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_template_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_expansion");
    for width in [4, 16, 64] {
        let (host, template) = template_product(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &template, |b, &template| {
            b.iter(|| {
                evaluate_type_schema(&host, black_box(template), SchemaOptions::default())
                    .expect("evaluates")
            })
        });
    }
    group.finish();
}

criterion_group!(schema_benches, bench_recursive_types, bench_template_expansion);
criterion_main!(schema_benches);
