use super::*;
use crate::error::GeomError;
use nalgebra::{Isometry3, Point3, Vector3};

fn unit(label: &str, x0: f64) -> BoxSolid {
    BoxSolid::cuboid(label, [x0, 0.0, 0.0], [x0 + 1.0, 1.0, 1.0])
}

#[test]
fn direction_codes_and_opposites() {
    for d in MotionDirection::ALL {
        assert_eq!(MotionDirection::from_code(d.code()), Some(d));
        assert_eq!(d.opposite().opposite(), d);
        assert!(d.canonical().is_positive());
        assert_eq!(d.unit().norm(), 1.0);
    }
    assert_eq!(MotionDirection::NegY.code(), -2);
    assert_eq!(MotionDirection::PosZ.name(), "POS_Z");
    assert!(MotionDirection::from_code(0).is_none());
    assert!(MotionDirection::from_code(4).is_none());
    // serde goes through the integer code
    let s = serde_json::to_string(&MotionDirection::NegX).unwrap();
    assert_eq!(s, "-1");
    let back: MotionDirection = serde_json::from_str("3").unwrap();
    assert_eq!(back, MotionDirection::PosZ);
    assert!(serde_json::from_str::<MotionDirection>("7").is_err());
}

#[test]
fn progress_range_flips_for_negative_directions() {
    let b = Aabb::from_corners([1.0, 2.0, 3.0], [4.0, 6.0, 8.0]);
    let px = b.progress_range(MotionDirection::PosX);
    assert_eq!((px.lo, px.hi), (1.0, 4.0));
    let nz = b.progress_range(MotionDirection::NegZ);
    assert_eq!((nz.lo, nz.hi), (-8.0, -3.0));
}

#[test]
fn elongation_reaches_the_far_side_only() {
    let overall = Aabb::from_corners([-10.0, -10.0, -10.0], [10.0, 10.0, 10.0]);
    let b = Aabb::from_corners([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let e = b.elongated(&overall, MotionDirection::PosY);
    assert_eq!(e.min, b.min);
    assert_eq!(e.max, Point3::new(1.0, 10.0, 1.0));
    let e = b.elongated(&overall, MotionDirection::NegX);
    assert_eq!(e.min, Point3::new(-10.0, 0.0, 0.0));
    assert_eq!(e.max, b.max);
}

#[test]
fn aabb_intersection_and_union() {
    let a = Aabb::from_corners([0.0; 3], [2.0; 3]);
    let b = Aabb::from_corners([1.0; 3], [3.0; 3]);
    let i = a.intersection(&b).unwrap();
    assert_eq!(i.volume(), 1.0);
    let c = Aabb::from_corners([2.0, 0.0, 0.0], [3.0, 1.0, 1.0]);
    // touching faces intersect with zero volume
    assert_eq!(a.intersection(&c).unwrap().volume(), 0.0);
    let far = Aabb::from_corners([5.0; 3], [6.0; 3]);
    assert!(a.intersection(&far).is_none());
    assert_eq!(Aabb::empty().union(&a), a);
    assert!(Aabb::empty().is_empty());
}

#[test]
fn box_scene_distance_and_closest_points() {
    let scene = BoxScene::new().with(unit("a", 0.0)).with(unit("b", 3.0));
    let d = scene.distance("a", "b").unwrap();
    assert!((d.value - 2.0).abs() < 1e-12);
    let (pa, pb) = d.pairs[0];
    assert_eq!(pa.x, 1.0);
    assert_eq!(pb.x, 3.0);

    let scene = BoxScene::new()
        .with(unit("a", 0.0))
        .with(BoxSolid::cuboid("b", [0.5, 0.5, 0.5], [2.0, 2.0, 2.0]));
    let d = scene.distance("a", "b").unwrap();
    assert_eq!(d.value, 0.0);
    assert_eq!(d.pairs[0].0, Point3::new(0.75, 0.75, 0.75));
}

#[test]
fn box_scene_classification_honours_tolerance() {
    let scene = BoxScene::new().with(unit("a", 0.0));
    let tol = 1e-3;
    let inside = scene.classify("a", &Point3::new(0.5, 0.5, 0.5), tol).unwrap();
    let on = scene.classify("a", &Point3::new(1.0, 0.5, 0.5), tol).unwrap();
    let near = scene.classify("a", &Point3::new(1.0005, 0.5, 0.5), tol).unwrap();
    let out = scene.classify("a", &Point3::new(1.1, 0.5, 0.5), tol).unwrap();
    assert_eq!(inside, PointState::Inside);
    assert_eq!(on, PointState::On);
    assert_eq!(near, PointState::On);
    assert_eq!(out, PointState::Outside);
}

#[test]
fn box_scene_section_and_volumes() {
    let touching = BoxScene::new().with(unit("a", 0.0)).with(unit("b", 1.0));
    assert!(touching.section("a", "b").unwrap());
    assert_eq!(touching.common_volume("a", "b").unwrap(), 0.0);
    assert_eq!(touching.fuse_volume("a", "b").unwrap(), 2.0);

    let apart = BoxScene::new().with(unit("a", 0.0)).with(unit("b", 1.5));
    assert!(!apart.section("a", "b").unwrap());

    let nested = BoxScene::new()
        .with(BoxSolid::cuboid("outer", [0.0; 3], [4.0; 3]))
        .with(BoxSolid::cuboid("inner", [1.0; 3], [2.0; 3]));
    assert!(!nested.section("outer", "inner").unwrap());
    assert_eq!(nested.common_volume("outer", "inner").unwrap(), 1.0);
    assert_eq!(nested.fuse_volume("outer", "inner").unwrap(), 64.0);
}

#[test]
fn proximity_and_mesh_samples_need_tessellation() {
    let mut scene = BoxScene::new().with(unit("a", 0.0)).with(unit("b", 1.0));
    assert!(matches!(
        scene.proximity("a", "b", 1e-5),
        Err(GeomError::NotTessellated(_))
    ));
    assert!(scene.sample_mesh("a", 0.5).is_err());
    let labels = scene.labels();
    ensure_tessellated(&mut scene, &labels, 0.1).unwrap();
    assert!(scene.proximity("a", "b", 1e-5).unwrap());
    assert!(scene.tessellate("a", 0.0).is_err());
}

#[test]
fn sample_counts_follow_spacing() {
    let mut scene = BoxScene::new().with(unit("a", 0.0));
    // 2x2 face cells on each of the six faces
    assert_eq!(scene.sample_surface("a", 0.5).unwrap().len(), 24);
    scene.tessellate("a", 0.1).unwrap();
    // 3x3 grid vertices per face
    assert_eq!(scene.sample_mesh("a", 0.5).unwrap().len(), 54);
    assert!(scene.sample_surface("a", -1.0).is_err());
    // huge spacing still samples every face once
    assert_eq!(scene.sample_surface("a", 100.0).unwrap().len(), 6);
}

#[test]
fn rotated_placements_are_rejected() {
    let mut scene = BoxScene::new().with(unit("a", 0.0));
    let rot = Isometry3::rotation(Vector3::new(0.0, 0.0, 0.3));
    assert!(matches!(
        scene.set_placement("a", rot),
        Err(GeomError::Unsupported { .. })
    ));
    assert!(matches!(
        scene.bound_box("nope"),
        Err(GeomError::UnknownComponent(_))
    ));
}

#[test]
fn duplicate_labels_are_rejected() {
    let err = BoxScene::from_solids(vec![unit("a", 0.0), unit("a", 2.0)]).unwrap_err();
    assert!(matches!(err, GeomError::Degenerate { .. }));
}

#[test]
fn moved_target_restores_on_drop() {
    let mut scene = BoxScene::new().with(unit("a", 0.0));
    let before = scene.bound_box("a").unwrap();
    {
        let mut guard = MovedTarget::new(&mut scene, "a").unwrap();
        guard.translate(&Vector3::new(5.0, 0.0, 0.0)).unwrap();
        assert_eq!(guard.bound_box("a").unwrap().min.x, 5.0);
    }
    assert_eq!(scene.bound_box("a").unwrap(), before);

    let mut guard = MovedTarget::new(&mut scene, "a").unwrap();
    guard.place_trailing_at(MotionDirection::NegX, 4.0).unwrap();
    // trailing face along -X is the max-x face, progress = -x
    assert_eq!(guard.bound_box("a").unwrap().max.x, -4.0);
    assert_eq!(guard.trailing(MotionDirection::NegX).unwrap(), 4.0);
    guard.restore().unwrap();
    assert_eq!(scene.bound_box("a").unwrap(), before);
}

#[test]
fn sample_cache_computes_once_and_follows_placement() {
    let mut scene = BoxScene::new().with(unit("a", 0.0));
    let mut cache = SampleCache::new();
    let first = cache.to_world(&scene, "a", SampleKind::Native, 0.5).unwrap();
    scene
        .set_placement("a", Isometry3::translation(10.0, 0.0, 0.0))
        .unwrap();
    let moved = cache.to_world(&scene, "a", SampleKind::Native, 0.5).unwrap();
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.len(), 1);
    for (p, q) in first.iter().zip(&moved) {
        assert!((q.x - p.x - 10.0).abs() < 1e-12);
    }
}

#[test]
fn compounds_merge_member_cells() {
    use crate::filter::PartFilter;
    let mut scene = BoxScene::new()
        .with(unit("a", 0.0))
        .with(unit("b", 1.0))
        .with(unit("c", 5.0));
    scene
        .set_placement("b", Isometry3::translation(0.0, 0.0, 1.0))
        .unwrap();
    let units = PartFilter::new()
        .compound("ab", ["a", "b"])
        .resolve(&scene.labels())
        .unwrap();
    let merged = scene.with_compounds(&units).unwrap();
    let mut labels = merged.labels();
    labels.sort();
    assert_eq!(labels, vec!["ab", "c"]);
    assert_eq!(merged.volume("ab").unwrap(), 2.0);
    // member placements are baked into the compound cells
    assert_eq!(merged.bound_box("ab").unwrap().max, Point3::new(2.0, 1.0, 2.0));
}
