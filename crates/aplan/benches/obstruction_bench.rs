//! Criterion benches for the obstruction pipeline (group "obstruction").
//!
//! - Bound-box refinement of every target of a 4x3x2 stack.
//! - Full +X detection with the volume and mesh-sampling criteria.
//!
//! Scenes come from fixed replay tokens so runs are comparable.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use aplan::api::{
    detect_obstructions, ensure_tessellated, overall_bound_box, random_stack, refine,
    CancelToken, MotionDirection, ObstructionConfig, ObstructionRefinement, ObstructionRequest,
    Reporter, ReplayToken, StackCfg, StepCfg,
};
use aplan::config::Criterion as Collision;

fn stack() -> aplan::api::BoxScene {
    let mut scene = random_stack(
        StackCfg {
            counts: [4, 3, 2],
            base_size: 5.0,
            ..StackCfg::default()
        },
        ReplayToken::new(42, 0),
    );
    let labels = scene.labels();
    ensure_tessellated(&mut scene, &labels, 0.1).expect("tessellate bench scene");
    scene
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("obstruction");
    let scene = stack();
    let comps = scene.labels();
    let overall = overall_bound_box(&scene, &comps).unwrap();
    let cancel = CancelToken::new();
    group.bench_function("refine_bound_box_all_targets", |b| {
        b.iter(|| {
            let mut n = 0usize;
            for t in &comps {
                if let Some(pairs) = refine(
                    &scene,
                    t,
                    &comps,
                    MotionDirection::PosX,
                    ObstructionRefinement::BoundBox,
                    &overall,
                    &cancel,
                )
                .finished()
                {
                    n += pairs.len();
                }
            }
            n
        })
    });
    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("obstruction");
    group.sample_size(10);
    let criteria = [
        (
            "common",
            Collision::Common {
                overlap_tolerance: 1e-5,
                volume_tolerance: 1e-5,
            },
        ),
        (
            "mesh_inside",
            Collision::MeshInside {
                overlap_tolerance: 1e-5,
                classification_tolerance: 1e-5,
                sample_coefficient: 0.05,
            },
        ),
    ];
    let base = stack();
    for (name, criterion) in criteria {
        let cfg = ObstructionConfig {
            refinement: ObstructionRefinement::BoundBox,
            criterion,
            step: StepCfg::Adaptive {
                coefficient: 0.1,
                min_step: 0.5,
            },
            ..ObstructionConfig::default()
        };
        let req = ObstructionRequest::new(base.labels(), vec![MotionDirection::PosX], cfg);
        group.bench_function(BenchmarkId::new("detect_pos_x", name), |b| {
            b.iter_batched(
                || base.clone(),
                |mut scene| {
                    detect_obstructions(&mut scene, &req, &CancelToken::new(), &Reporter::silent())
                        .is_finished()
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_refine, bench_detect);
criterion_main!(benches);
