use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lamina::rank::{longest_path, network_simplex::network_simplex};
use lamina::{CancelToken, LayoutConfig, LayoutInput, Size, layout_input};
use std::hint::black_box;
use std::time::Duration;

/// A spine plus forward edges of growing span, so both segments and crossings show up.
fn build_dag(node_count: usize, fanout: usize) -> Vec<(usize, usize)> {
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for i in 0..node_count.saturating_sub(1) {
        edges.push((i, i + 1));
    }
    for i in 0..node_count {
        for k in 2..=(fanout + 1) {
            let to = i + k;
            if to >= node_count {
                break;
            }
            edges.push((i, to));
        }
        let to = i + 10;
        if to < node_count {
            edges.push((i, to));
        }
    }
    edges
}

fn build_input(node_count: usize, edges: &[(usize, usize)]) -> LayoutInput<usize, usize> {
    LayoutInput::from_parts(
        (0..node_count)
            .map(|v| (v, Size::new(40.0 + (v % 3) as f64 * 10.0, 20.0)))
            .collect(),
        edges
            .iter()
            .enumerate()
            .map(|(e, &(v, w))| (e, v, w))
            .collect(),
    )
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("dag_50_f3", 50usize, 3usize),
        ("dag_200_f4", 200usize, 4usize),
        ("dag_400_f4", 400usize, 4usize),
    ];

    for (name, nodes, fanout) in cases {
        let input = build_input(nodes, &build_dag(nodes, fanout));
        for (label, compaction_threshold) in [("segments", 0usize), ("chains", usize::MAX)] {
            let config = LayoutConfig {
                compaction_threshold,
                ..LayoutConfig::default()
            };
            group.bench_with_input(BenchmarkId::new(label, name), &input, |b, input| {
                b.iter(|| {
                    let result = layout_input(black_box(input), &config, &CancelToken::new());
                    black_box(result.map(|r| r.crossings).unwrap_or_default())
                })
            });
        }
    }

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for (name, nodes, fanout) in [("dag_200_f4", 200usize, 4usize), ("dag_400_f4", 400, 4)] {
        let edges = build_dag(nodes, fanout);
        group.bench_with_input(
            BenchmarkId::new("longest_path", name),
            &edges,
            |b, edges| b.iter(|| black_box(longest_path(nodes, black_box(edges)))),
        );
        group.bench_with_input(
            BenchmarkId::new("network_simplex", name),
            &edges,
            |b, edges| b.iter(|| black_box(network_simplex(nodes, black_box(edges)))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_layout, bench_rank);
criterion_main!(benches);
