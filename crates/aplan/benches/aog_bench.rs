//! Criterion benches for AND/OR graph generation (group "aog").
//!
//! Complete and grid-shaped contact graphs of growing size, without blocking rules,
//! plus one run with rules taken from a detected +X obstruction graph.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use aplan::api::{
    detect_connections, detect_obstructions, generate, random_stack, CancelToken,
    ConnectionConfig, ConnectionGraph, MotionDirection, ObstructionConfig,
    ObstructionRefinement, ObstructionRequest, Reporter, ReplayToken, StackCfg, StepCfg,
};

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("c{i}")).collect()
}

fn bench_complete(c: &mut Criterion) {
    let mut group = c.benchmark_group("aog");
    for n in [4usize, 6, 8] {
        let comps = names(n);
        let topo = ConnectionGraph::complete(comps.iter().cloned());
        group.bench_with_input(BenchmarkId::new("complete", n), &n, |b, _| {
            b.iter(|| generate(&comps, Some(&topo), &[]).map(|g| g.edge_count()))
        });
    }
    group.finish();
}

fn bench_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("aog");
    group.sample_size(10);
    let cfg = StackCfg {
        counts: [3, 3, 1],
        ..StackCfg::default()
    };
    let mut scene = random_stack(cfg, ReplayToken::new(7, 0));
    let comps = scene.labels();
    let cancel = CancelToken::new();
    let quiet = Reporter::silent();
    let Some(topo) =
        detect_connections(&mut scene, &comps, &ConnectionConfig::default(), &cancel, &quiet)
            .finished()
    else {
        return;
    };
    group.bench_function("grid_3x3_topology_only", |b| {
        b.iter(|| generate(&comps, Some(&topo), &[]).map(|g| g.node_count()))
    });

    let ocfg = ObstructionConfig {
        refinement: ObstructionRefinement::BoundBox,
        step: StepCfg::Fixed { step: 1.0 },
        ..ObstructionConfig::default()
    };
    let req = ObstructionRequest::new(comps.clone(), vec![MotionDirection::PosX], ocfg);
    if let Some(report) = detect_obstructions(&mut scene, &req, &cancel, &quiet).finished() {
        let graphs = report.graphs();
        group.bench_function("grid_3x3_with_pos_x_rules", |b| {
            b.iter(|| generate(&comps, Some(&topo), &graphs).map(|g| g.node_count()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_complete, bench_stack);
criterion_main!(benches);
