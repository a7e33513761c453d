//! Layout and frame throughput on a large tree.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use trellis::{
    Canvas, FrameInput,
    constraint::BoxConstraint,
    error::Result,
    geom::Vec2,
    layout::{FlowLayout, Layout, VerticalLayout},
    scroll::ScrollableAxis,
};

/// A scrolling list of `rows` rows, each holding a wrapping flow of tiles.
fn build(rows: usize, tiles: usize) -> Result<Canvas> {
    let mut canvas = Canvas::new(Vec2::new(800.0, 600.0));
    let root = canvas.root();
    let list = canvas.create_node_with(
        "list",
        BoxConstraint::fill().into(),
        VerticalLayout {
            spacing: 2.0,
            ..VerticalLayout::default()
        }
        .into(),
    );
    canvas.add_child(root, list)?;
    canvas.set_scrollable(list, ScrollableAxis::VERTICAL)?;
    for r in 0..rows {
        let row = canvas.create_node_with(
            &format!("row{r}"),
            BoxConstraint::fixed(780.0, 24.0 * 4.0 + 12.0).into(),
            FlowLayout {
                spacing: Vec2::splat(4.0),
                ..FlowLayout::default()
            }
            .into(),
        );
        canvas.add_child(list, row)?;
        for t in 0..tiles {
            let tile = canvas.create_node_with(
                &format!("tile{t}"),
                BoxConstraint::fixed(60.0, 24.0).into(),
                Layout::default(),
            );
            canvas.add_child(row, tile)?;
        }
    }
    canvas.refresh_layout()?;
    Ok(canvas)
}

/// Benchmark full relayout and per-frame cost.
fn benchmark_layout(c: &mut Criterion) {
    let Ok(mut canvas) = build(200, 30) else {
        return;
    };
    c.bench_function("refresh_6000_nodes", |b| {
        let mut wide = false;
        b.iter(|| {
            wide = !wide;
            let width = if wide { 820.0 } else { 800.0 };
            canvas.resize(Vec2::new(width, 600.0));
            black_box(canvas.refresh_layout())
        });
    });
    let input = FrameInput::at(Vec2::new(400.0, 300.0));
    c.bench_function("frame_6000_nodes", |b| {
        b.iter(|| black_box(canvas.update(&input, 1.0 / 60.0)));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_layout
}
criterion_main!(benches);
