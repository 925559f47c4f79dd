//! Benchmarks for tooltip placement and step validation.
//!
//! Run with: cargo bench -p waypoint-core

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;
use waypoint_core::geometry::{ElementGeometry, Rect, Size, Viewport};
use waypoint_core::placement::{PlacementOptions, resolve_placement};
use waypoint_core::step::Placement;
use waypoint_core::validate::validate_steps_json;

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/resolve");
    let viewport = Viewport::new(1280.0, 800.0);
    let tooltip = Size::new(320.0, 150.0);
    let opts = PlacementOptions::default();

    let cases = [
        ("centered", Rect::new(600.0, 350.0, 80.0, 40.0)),
        ("bottom_edge", Rect::new(600.0, 760.0, 80.0, 30.0)),
        ("corner", Rect::new(1250.0, 780.0, 20.0, 15.0)),
        ("full_height", Rect::new(10.0, 0.0, 200.0, 800.0)),
    ];

    for (name, rect) in cases {
        let target = ElementGeometry::from_document_rect(rect);
        group.bench_with_input(BenchmarkId::new("auto", name), &target, |b, target| {
            b.iter(|| {
                black_box(resolve_placement(
                    target,
                    tooltip,
                    &viewport,
                    Placement::Auto,
                    &opts,
                ))
            })
        });
    }

    group.finish();
}

fn make_steps(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({
                    "id": format!("step-{i}"),
                    "target": format!("#target-{i}"),
                    "title": "Title",
                    "content": "Body text",
                    "placement": "auto"
                })
            })
            .collect(),
    )
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate/steps_json");
    for n in [5, 50, 500] {
        let steps = make_steps(n);
        group.bench_with_input(BenchmarkId::new("valid", n), &steps, |b, steps| {
            b.iter(|| black_box(validate_steps_json(steps)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_validate);
criterion_main!(benches);
