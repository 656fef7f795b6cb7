//! Benchmarks for the hot per-sample paths: value/smoothed iterators,
//! input manager `get_value_next`, and a full `Group::process_subgraph`
//! block through the sentinel Copy nodes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sonido_core::{
    Group, InputSnapshot, NodeRole, SmoothedIterator, ValueIterator,
};

const BLOCK: usize = 512;

fn bench_value_iterator(c: &mut Criterion) {
    let data: Vec<f32> = (0..BLOCK).map(|i| (i as f32 * 0.01).sin()).collect();
    c.bench_function("value_iterator_512_samples_lod4", |b| {
        b.iter(|| {
            let mut it = ValueIterator::new(black_box(&data), 4.0);
            let mut acc = 0.0f32;
            for _ in 0..BLOCK {
                acc += it.next_value();
            }
            black_box(acc)
        });
    });
}

fn bench_smoothed_iterator(c: &mut Criterion) {
    let data: Vec<f32> = (0..BLOCK).map(|i| (i as f32 * 0.01).sin()).collect();
    c.bench_function("smoothed_iterator_512_samples_lod4", |b| {
        b.iter(|| {
            let mut it = SmoothedIterator::new(ValueIterator::new(black_box(&data), 4.0));
            let mut acc = 0.0f32;
            for _ in 0..BLOCK {
                acc += it.next_value();
            }
            black_box(acc)
        });
    });
}

fn bench_input_manager_get_value_next(c: &mut Criterion) {
    use sonido_core::InputManager;

    let mut mgr = InputManager::new(1);
    let snapshot = InputSnapshot::Buffer { data: vec![0.5; BLOCK / 4], lod: 4.0 };
    c.bench_function("input_manager_get_value_next_512", |b| {
        b.iter(|| {
            mgr.batch_update(black_box(std::slice::from_ref(&snapshot)));
            let mut acc = 0.0f32;
            for _ in 0..BLOCK {
                acc += mgr.get_value_next(0);
            }
            black_box(acc)
        });
    });
}

fn bench_group_process_subgraph(c: &mut Criterion) {
    c.bench_function("group_process_subgraph_512_passthrough", |b| {
        b.iter(|| {
            let mut group = Group::new(2, 2);
            let input = group.input_node_id();
            let output = group.output_node_id();
            group.connect(input, 0, output, 0);
            group.connect(input, 1, output, 1);
            group.process_subgraph(black_box(BLOCK));
        });
    });
}

fn bench_group_with_node_chain(c: &mut Criterion) {
    use sonido_core::{CopyOperation, TypeId};

    c.bench_function("group_process_subgraph_512_chained_copy", |b| {
        b.iter(|| {
            let mut group = Group::new(1, 1);
            let input = group.input_node_id();
            let output = group.output_node_id();
            let copy = group.new_node(TypeId(100), "Copy", NodeRole::Default, Box::new(CopyOperation::new(1)));
            group.connect(input, 0, copy, 0);
            group.connect(copy, 0, output, 0);
            group.process_subgraph(black_box(BLOCK));
        });
    });
}

criterion_group!(
    benches,
    bench_value_iterator,
    bench_smoothed_iterator,
    bench_input_manager_get_value_next,
    bench_group_process_subgraph,
    bench_group_with_node_chain,
);
criterion_main!(benches);
